//! Finds APY differentials for the same asset across protocols.
//!
//! Only single-asset style pools (lending, staking, no-IL vaults) are compared,
//! since a spread between an LP position and a deposit is not actionable.

use std::collections::{BTreeMap, HashSet};
use tracing::debug;
use crate::{
    assets::{normalize_symbol, primary_asset},
    config::{Config, ReferenceData, DEFAULT_TOP_SPREADS},
    pools::{estimate_slippage, DEFAULT_SLIPPAGE_FACTOR},
    types::{
        AssetType, ProcessedPool, ProtocolArchetype, SpreadConfidence, SpreadLeg, SpreadReport,
        YieldSpread,
    },
    utils::round2,
};

pub const MIN_SPREAD_POOL_TVL_USD: f64 = 1_000_000.0;
pub const MAX_SPREAD_POOL_APY: f64 = 500.0;
pub const MIN_NET_SPREAD: f64 = 0.5;

/// Share of the headline spread that base APY must cover to count as sustainable.
pub const BASE_DRIVEN_RATIO: f64 = 0.5;
/// Round-trip cost: half the one-way slippage is charged against the spread.
pub const SLIPPAGE_COST_FACTOR: f64 = 0.5;
pub const EQUAL_RISK_MULTIPLIER: f64 = 2.0;

pub const HIGH_CONFIDENCE_LIQUIDITY: f64 = 50_000_000.0;
pub const HIGH_CONFIDENCE_SPREAD: f64 = 2.0;
pub const MEDIUM_CONFIDENCE_LIQUIDITY: f64 = 10_000_000.0;
pub const MEDIUM_CONFIDENCE_SPREAD: f64 = 1.5;

#[derive(Debug, Clone)]
pub struct SpreadFilters {
    pub chain: Option<String>,
    pub asset: Option<String>,
    pub min_spread: f64,
    pub position_usd: f64,
    pub top_n: usize,
}

impl Default for SpreadFilters {
    fn default() -> Self {
        SpreadFilters::from(&Config::default())
    }
}

impl From<&Config> for SpreadFilters {
    fn from(config: &Config) -> Self {
        Self {
            chain: config.spread_chain.clone(),
            asset: config.spread_asset.clone(),
            min_spread: config.min_spread_pct,
            position_usd: config.spread_position_usd,
            top_n: DEFAULT_TOP_SPREADS,
        }
    }
}

pub fn is_single_asset(pool: &ProcessedPool) -> bool {
    pool.il_risk.as_deref() == Some("no")
        || matches!(pool.archetype, ProtocolArchetype::Lending | ProtocolArchetype::LiquidStaking)
        || pool.underlying_assets.len() == 1
}

fn pool_asset(pool: &ProcessedPool, reference: &ReferenceData) -> Option<String> {
    pool.underlying_assets
        .first()
        .cloned()
        .or_else(|| primary_asset(&pool.symbol, reference))
}

fn leg(pool: &ProcessedPool) -> SpreadLeg {
    SpreadLeg {
        pool_id: pool.id.clone(),
        protocol: pool.project_slug.clone(),
        chain: pool.chain.clone(),
        symbol: pool.symbol.clone(),
        apy: pool.apy,
        apy_base: pool.apy_base,
        apy_reward: pool.apy_reward,
        tvl: pool.tvl_usd,
        risk_score: pool.risk_score,
        risk_level: pool.risk_level,
    }
}

pub fn spread_confidence(min_liquidity: f64, is_base_apy_driven: bool, apy_spread: f64) -> SpreadConfidence {
    if min_liquidity >= HIGH_CONFIDENCE_LIQUIDITY && is_base_apy_driven && apy_spread >= HIGH_CONFIDENCE_SPREAD {
        SpreadConfidence::High
    } else if min_liquidity >= MEDIUM_CONFIDENCE_LIQUIDITY && apy_spread >= MEDIUM_CONFIDENCE_SPREAD {
        SpreadConfidence::Medium
    } else {
        SpreadConfidence::Low
    }
}

/// Evaluate one high/low pair. `None` when the pair is not worth reporting.
pub fn evaluate_pair(
    asset: &str,
    high: &ProcessedPool,
    low: &ProcessedPool,
    filters: &SpreadFilters,
    reference: &ReferenceData,
) -> Option<YieldSpread> {
    if high.project_slug == low.project_slug {
        return None;
    }

    let apy_spread = high.apy - low.apy;
    if apy_spread < filters.min_spread {
        return None;
    }

    let base_apy_spread = high.apy_base - low.apy_base;
    let is_base_apy_driven = base_apy_spread >= apy_spread * BASE_DRIVEN_RATIO;

    let risk_gap = high.risk_score.abs_diff(low.risk_score);
    let risk_adjusted_spread = if risk_gap == 0 {
        apy_spread * EQUAL_RISK_MULTIPLIER
    } else {
        apy_spread / risk_gap as f64
    };

    let min_liquidity = high.tvl_usd.min(low.tvl_usd);
    let estimated_slippage = estimate_slippage(filters.position_usd, min_liquidity, DEFAULT_SLIPPAGE_FACTOR);
    let net_spread = apy_spread - estimated_slippage * SLIPPAGE_COST_FACTOR;
    if net_spread < MIN_NET_SPREAD {
        return None;
    }

    let apy_spread_percent = if low.apy > 0.0 {
        round2(apy_spread / low.apy * 100.0)
    } else {
        0.0
    };

    Some(YieldSpread {
        asset: asset.to_string(),
        asset_type: if reference.is_stablecoin(asset) {
            AssetType::Stablecoin
        } else {
            AssetType::Volatile
        },
        high_pool: leg(high),
        low_pool: leg(low),
        apy_spread,
        apy_spread_percent,
        risk_adjusted_spread: round2(risk_adjusted_spread),
        base_apy_spread,
        is_base_apy_driven,
        min_liquidity,
        estimated_slippage,
        net_spread,
        confidence: spread_confidence(min_liquidity, is_base_apy_driven, apy_spread),
    })
}

pub fn detect_spreads(
    pools: &[ProcessedPool],
    filters: &SpreadFilters,
    reference: &ReferenceData,
) -> SpreadReport {
    let wanted_asset = filters.asset.as_deref().map(|a| normalize_symbol(a, reference));

    let mut groups: BTreeMap<String, Vec<&ProcessedPool>> = BTreeMap::new();
    for pool in pools {
        if !is_single_asset(pool)
            || pool.tvl_usd < MIN_SPREAD_POOL_TVL_USD
            || !(pool.apy > 0.0 && pool.apy <= MAX_SPREAD_POOL_APY)
        {
            continue;
        }
        if let Some(chain) = &filters.chain {
            if !pool.chain.eq_ignore_ascii_case(chain) {
                continue;
            }
        }
        let Some(asset) = pool_asset(pool, reference) else {
            continue;
        };
        if wanted_asset.as_ref().is_some_and(|wanted| *wanted != asset) {
            continue;
        }
        groups.entry(asset).or_default().push(pool);
    }

    let mut spreads = Vec::new();
    for (asset, mut group) in groups {
        let protocols: HashSet<&str> = group.iter().map(|p| p.project_slug.as_str()).collect();
        if group.len() < 2 || protocols.len() < 2 {
            continue;
        }
        group.sort_by(|a, b| b.apy.total_cmp(&a.apy).then_with(|| a.id.cmp(&b.id)));

        let high = group[0];
        for low in &group[1..] {
            if let Some(spread) = evaluate_pair(&asset, high, low, filters, reference) {
                spreads.push(spread);
            }
        }
    }

    spreads.sort_by(|a, b| b.net_spread.total_cmp(&a.net_spread));
    let top = spreads.iter().take(filters.top_n).cloned().collect();

    debug!(spreads = spreads.len(), "Detected yield spreads");
    SpreadReport { spreads, top }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pools::process_pool;
    use crate::types::RawPool;

    fn lending_pool(id: &str, project: &str, symbol: &str, tvl: f64, apy: f64, apy_base: f64) -> ProcessedPool {
        let raw = RawPool {
            id: id.to_string(),
            chain: "Ethereum".to_string(),
            project: project.to_string(),
            symbol: symbol.to_string(),
            tvl_usd: Some(tvl),
            apy: Some(apy),
            apy_base: Some(apy_base),
            apy_reward: Some(apy - apy_base),
            stablecoin: Some(true),
            il_risk: Some("no".to_string()),
            exposure: Some("single".to_string()),
            ..Default::default()
        };
        process_pool(&raw, &ReferenceData::default())
    }

    #[test]
    fn test_base_driven_usdc_spread_is_high_confidence() {
        let reference = ReferenceData::default();
        let pools = vec![
            lending_pool("a", "compound-v3", "USDC", 200_000_000.0, 12.0, 12.0),
            lending_pool("b", "aave-v3", "USDC", 150_000_000.0, 6.0, 6.0),
        ];

        let report = detect_spreads(&pools, &SpreadFilters::default(), &reference);
        assert_eq!(report.spreads.len(), 1);
        let spread = &report.spreads[0];
        assert_eq!(spread.asset, "USDC");
        assert_eq!(spread.asset_type, AssetType::Stablecoin);
        assert_eq!(spread.apy_spread, 6.0);
        assert!(spread.is_base_apy_driven);
        assert_eq!(spread.confidence, SpreadConfidence::High);
        assert_eq!(spread.apy_spread_percent, 100.0);
        assert_eq!(spread.high_pool.protocol, "compound-v3");
        assert!(spread.net_spread >= MIN_NET_SPREAD);
    }

    #[test]
    fn test_same_protocol_pairs_are_ignored() {
        let reference = ReferenceData::default();
        let pools = vec![
            lending_pool("a", "aave-v3", "USDC", 2e8, 12.0, 12.0),
            lending_pool("b", "aave-v3", "USDC.e", 2e8, 4.0, 4.0),
            lending_pool("c", "spark", "USDC", 2e8, 5.0, 5.0),
        ];

        let report = detect_spreads(&pools, &SpreadFilters::default(), &reference);
        assert_eq!(report.spreads.len(), 1);
        assert_eq!(report.spreads[0].low_pool.protocol, "spark");
    }

    #[test]
    fn test_reward_driven_spread_is_not_base_driven() {
        let reference = ReferenceData::default();
        let pools = vec![
            lending_pool("a", "radiant-v2", "WETH", 3e7, 9.0, 1.0),
            lending_pool("b", "aave-v3", "WETH", 2e9, 2.0, 2.0),
        ];

        let report = detect_spreads(&pools, &SpreadFilters::default(), &reference);
        let spread = &report.spreads[0];
        assert_eq!(spread.asset, "ETH");
        assert_eq!(spread.asset_type, AssetType::Volatile);
        assert!(!spread.is_base_apy_driven);
        assert_eq!(spread.confidence, SpreadConfidence::Medium);
    }

    #[test]
    fn test_below_threshold_and_illiquid_pools_skipped() {
        let reference = ReferenceData::default();
        let pools = vec![
            lending_pool("a", "compound-v3", "USDT", 2e8, 5.5, 5.5),
            lending_pool("b", "aave-v3", "USDT", 2e8, 5.0, 5.0),
            lending_pool("c", "tiny-lend", "USDT", 500_000.0, 40.0, 40.0),
            lending_pool("d", "degen-lend", "USDT", 5e6, 900.0, 900.0),
        ];

        let report = detect_spreads(&pools, &SpreadFilters::default(), &reference);
        assert!(report.spreads.is_empty());
    }

    #[test]
    fn test_equal_risk_doubles_adjusted_spread() {
        let reference = ReferenceData::default();
        let high = lending_pool("a", "compound-v3", "DAI", 2e8, 8.0, 8.0);
        let low = lending_pool("b", "aave-v3", "DAI", 2e8, 5.0, 5.0);
        assert_eq!(high.risk_score, low.risk_score);

        let spread = evaluate_pair("DAI", &high, &low, &SpreadFilters::default(), &reference).unwrap();
        assert_eq!(spread.risk_adjusted_spread, 6.0);
    }

    #[test]
    fn test_filters_and_top_slice() {
        let reference = ReferenceData::default();
        let mut pools = Vec::new();
        for (i, asset) in ["USDC", "USDT", "DAI", "FRAX", "GHO", "LUSD", "USDE"].iter().enumerate() {
            pools.push(lending_pool(&format!("h{}", i), "compound-v3", asset, 2e8, 10.0 + i as f64, 10.0));
            pools.push(lending_pool(&format!("l{}", i), "aave-v3", asset, 2e8, 3.0, 3.0));
        }

        let report = detect_spreads(&pools, &SpreadFilters::default(), &reference);
        assert_eq!(report.spreads.len(), 7);
        assert_eq!(report.top.len(), 5);
        assert_eq!(report.top[0].asset, "USDE");
        assert!(report.spreads.windows(2).all(|w| w[0].net_spread >= w[1].net_spread));

        let only_dai = SpreadFilters {
            asset: Some("dai".to_string()),
            ..Default::default()
        };
        assert_eq!(detect_spreads(&pools, &only_dai, &reference).spreads.len(), 1);

        let other_chain = SpreadFilters {
            chain: Some("Arbitrum".to_string()),
            ..Default::default()
        };
        assert!(detect_spreads(&pools, &other_chain, &reference).spreads.is_empty());
    }
}
