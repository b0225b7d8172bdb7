//! Turns raw aggregator pools into risk-annotated `ProcessedPool`s.

use serde::Serialize;
use tracing::{debug, info};
use crate::{
    assets::extract_assets,
    config::{ReferenceData, MAX_VALID_APY},
    pools::{assess_liquidity_risk, classify_archetype},
    risk::{derive_dependencies, score_pool, RiskInput},
    types::{ProcessedPool, RawPool},
    utils::{finite_or_zero, slugify},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingSummary {
    pub input: usize,
    pub kept: usize,
    pub dropped_invalid: usize,
    pub dropped_below_floor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Invalid(&'static str),
    BelowFloor,
}

fn valid_apy(value: Option<f64>) -> bool {
    match value {
        None => true,
        Some(v) => v.is_finite() && (0.0..=MAX_VALID_APY).contains(&v),
    }
}

fn check_pool(pool: &RawPool, min_tvl_usd: f64) -> Result<f64, Rejection> {
    if pool.id.trim().is_empty() {
        return Err(Rejection::Invalid("missing id"));
    }
    let tvl = match pool.tvl_usd {
        Some(t) if t.is_finite() && t >= 0.0 => t,
        _ => return Err(Rejection::Invalid("bad tvl")),
    };
    if !valid_apy(pool.apy) {
        return Err(Rejection::Invalid("apy out of range"));
    }
    // Components may legitimately be negative (e.g. IL-adjusted base yield)
    // but never non-finite.
    if pool.apy_base.is_some_and(|v| !v.is_finite()) || pool.apy_reward.is_some_and(|v| !v.is_finite()) {
        return Err(Rejection::Invalid("non-finite apy component"));
    }
    if tvl < min_tvl_usd {
        return Err(Rejection::BelowFloor);
    }
    Ok(tvl)
}

/// Score a single pool. Callers are expected to have validated it.
pub fn process_pool(pool: &RawPool, reference: &ReferenceData) -> ProcessedPool {
    let project_slug = slugify(&pool.project);
    let underlying_assets = extract_assets(&pool.symbol, reference);
    let archetype = classify_archetype(&project_slug, reference);
    let tvl_usd = finite_or_zero(pool.tvl_usd).max(0.0);

    let assessment = score_pool(
        &RiskInput {
            tvl_usd: pool.tvl_usd,
            apy: pool.apy,
            apy_base: pool.apy_base,
            apy_reward: pool.apy_reward,
            stablecoin: pool.stablecoin,
            il_risk: pool.il_risk.as_deref(),
            exposure: pool.exposure.as_deref(),
            underlying_assets: &underlying_assets,
            project_slug: &project_slug,
        },
        reference,
    );
    let liquidity_risk = assess_liquidity_risk(tvl_usd, archetype);
    let dependencies = derive_dependencies(
        &project_slug,
        &pool.chain,
        tvl_usd,
        &underlying_assets,
        archetype,
        reference,
    );

    ProcessedPool {
        id: pool.id.clone(),
        chain: pool.chain.clone(),
        project: pool.project.clone(),
        project_slug,
        symbol: pool.symbol.clone(),
        tvl_usd,
        apy: finite_or_zero(pool.apy),
        apy_base: finite_or_zero(pool.apy_base),
        apy_reward: finite_or_zero(pool.apy_reward),
        stablecoin: pool.stablecoin.unwrap_or(false),
        il_risk: pool.il_risk.clone(),
        exposure: pool.exposure.clone(),
        underlying_tokens: pool.underlying_tokens.clone().unwrap_or_default(),
        underlying_assets,
        archetype,
        risk_score: assessment.score,
        risk_level: assessment.level,
        risk_breakdown: assessment.breakdown,
        liquidity_risk,
        dependencies,
        apy_stability: None,
    }
}

/// Validate, score and sort (TVL descending) a raw pool list.
pub fn process_pools(
    raw_pools: &[RawPool],
    min_tvl_usd: f64,
    reference: &ReferenceData,
) -> (Vec<ProcessedPool>, ProcessingSummary) {
    let mut summary = ProcessingSummary {
        input: raw_pools.len(),
        ..Default::default()
    };
    let mut processed = Vec::with_capacity(raw_pools.len());

    for pool in raw_pools {
        match check_pool(pool, min_tvl_usd) {
            Ok(_) => processed.push(process_pool(pool, reference)),
            Err(Rejection::BelowFloor) => summary.dropped_below_floor += 1,
            Err(Rejection::Invalid(reason)) => {
                debug!(pool_id = %pool.id, reason, "Dropping malformed pool");
                summary.dropped_invalid += 1;
            }
        }
    }

    processed.sort_by(|a, b| b.tvl_usd.total_cmp(&a.tvl_usd));
    summary.kept = processed.len();

    info!(
        input = summary.input,
        kept = summary.kept,
        dropped_invalid = summary.dropped_invalid,
        dropped_below_floor = summary.dropped_below_floor,
        "Processed pool list"
    );

    (processed, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProtocolArchetype, RiskLevel};

    fn raw(id: &str, project: &str, symbol: &str, tvl: f64, apy: f64) -> RawPool {
        RawPool {
            id: id.to_string(),
            chain: "Ethereum".to_string(),
            project: project.to_string(),
            symbol: symbol.to_string(),
            tvl_usd: Some(tvl),
            apy: Some(apy),
            apy_base: Some(apy),
            apy_reward: None,
            ..Default::default()
        }
    }

    #[test]
    fn test_process_pool_populates_all_annotations() {
        let reference = ReferenceData::default();
        let mut pool = raw("p1", "Aave V3", "USDC", 2e9, 4.0);
        pool.stablecoin = Some(true);
        pool.il_risk = Some("no".to_string());

        let processed = process_pool(&pool, &reference);
        assert_eq!(processed.project_slug, "aave-v3");
        assert_eq!(processed.underlying_assets, vec!["USDC"]);
        assert_eq!(processed.archetype, ProtocolArchetype::Lending);
        assert_eq!(processed.risk_score, 0);
        assert_eq!(processed.risk_level, RiskLevel::Low);
        assert_eq!(processed.risk_score, processed.risk_breakdown.total());
        assert!(processed.apy_stability.is_none());
        assert!(!processed.dependencies.is_empty());
    }

    #[test]
    fn test_process_pools_drops_malformed_and_sorts_by_tvl() {
        let reference = ReferenceData::default();
        let pools = vec![
            raw("small", "uniswap-v3", "WETH-USDC", 2e6, 10.0),
            raw("nan", "uniswap-v3", "WETH-USDC", f64::NAN, 10.0),
            raw("neg", "uniswap-v3", "WETH-USDC", -5.0, 10.0),
            raw("crazy-apy", "uniswap-v3", "WETH-USDC", 5e6, 20_000.0),
            raw("dust", "uniswap-v3", "WETH-USDC", 50.0, 10.0),
            raw("big", "uniswap-v3", "WETH-USDC", 9e8, 10.0),
        ];

        let (processed, summary) = process_pools(&pools, 10_000.0, &reference);
        let ids: Vec<&str> = processed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["big", "small"]);
        assert_eq!(
            summary,
            ProcessingSummary { input: 6, kept: 2, dropped_invalid: 3, dropped_below_floor: 1 }
        );
    }

    #[test]
    fn test_missing_apy_is_kept_as_zero() {
        let reference = ReferenceData::default();
        let mut pool = raw("p", "curve-dex", "USDC-USDT", 3e7, 0.0);
        pool.apy = None;
        let (processed, _) = process_pools(&[pool], 0.0, &reference);
        assert_eq!(processed[0].apy, 0.0);
    }
}
