//! Rule-based 0-100 composite risk score.
//!
//! Five factors are summed: TVL (0-30), APY (0-25, +5 when reward-dependent),
//! stablecoin exposure (0-20), impermanent loss (0-15) and protocol maturity
//! (0-10). The total is not clamped, so a reward-heavy tiny pool can reach 105.

use crate::config::ReferenceData;
use crate::types::{RiskBreakdown, RiskLevel};
use crate::utils::finite_or_zero;

// TVL tiers (USD)
pub const TVL_TIER_BILLION: f64 = 1_000_000_000.0;
pub const TVL_TIER_HUNDRED_MILLION: f64 = 100_000_000.0;
pub const TVL_TIER_TEN_MILLION: f64 = 10_000_000.0;

/// Share of APY coming from emissions above which the yield is penalized.
pub const REWARD_DEPENDENCY_RATIO: f64 = 0.7;
pub const REWARD_DEPENDENCY_PENALTY: u32 = 5;

// Level bands on the total score
pub const LOW_RISK_MAX: u32 = 20;
pub const MEDIUM_RISK_MAX: u32 = 40;
pub const HIGH_RISK_MAX: u32 = 60;

/// Scoring inputs for a single pool.
#[derive(Debug, Clone, Default)]
pub struct RiskInput<'a> {
    pub tvl_usd: Option<f64>,
    pub apy: Option<f64>,
    pub apy_base: Option<f64>,
    pub apy_reward: Option<f64>,
    pub stablecoin: Option<bool>,
    pub il_risk: Option<&'a str>,
    pub exposure: Option<&'a str>,
    pub underlying_assets: &'a [String],
    pub project_slug: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskAssessment {
    pub score: u32,
    pub level: RiskLevel,
    pub breakdown: RiskBreakdown,
}

pub fn tvl_score(tvl_usd: f64) -> u32 {
    match tvl_usd {
        t if t >= TVL_TIER_BILLION => 0,
        t if t >= TVL_TIER_HUNDRED_MILLION => 10,
        t if t >= TVL_TIER_TEN_MILLION => 20,
        _ => 30,
    }
}

pub fn apy_score(apy: f64, apy_reward: f64) -> u32 {
    let base = match apy {
        a if a > 50.0 => 25,
        a if a > 20.0 => 15,
        a if a > 10.0 => 10,
        _ => 0,
    };
    if apy_reward / apy.max(1.0) > REWARD_DEPENDENCY_RATIO {
        base + REWARD_DEPENDENCY_PENALTY
    } else {
        base
    }
}

pub fn stablecoin_score(flagged_stable: bool, assets: &[String], reference: &ReferenceData) -> u32 {
    if flagged_stable {
        return 0;
    }
    // Unknown composition is scored as the riskiest bucket.
    if assets.is_empty() {
        return 20;
    }
    let stable_count = assets.iter().filter(|a| reference.is_stablecoin(a)).count();
    let all_blue_chip = assets.iter().all(|a| reference.is_blue_chip(a));

    if stable_count == assets.len() {
        0
    } else if stable_count > 0 && all_blue_chip {
        5
    } else if all_blue_chip {
        10
    } else {
        20
    }
}

pub fn il_score(
    il_risk: Option<&str>,
    exposure: Option<&str>,
    assets: &[String],
    reference: &ReferenceData,
) -> u32 {
    if il_risk == Some("no") {
        return 0;
    }
    if il_risk == Some("yes") && assets.len() <= 1 {
        return 0;
    }
    if exposure == Some("single") {
        return 0;
    }
    match assets {
        [a, b] => {
            let correlated = a == b || (reference.is_stablecoin(a) && reference.is_stablecoin(b));
            if correlated { 5 } else { 15 }
        }
        assets if assets.len() >= 3 => 15,
        _ => 0,
    }
}

pub fn protocol_score(project_slug: &str, tvl_usd: f64, reference: &ReferenceData) -> u32 {
    if reference.is_established(project_slug) {
        0
    } else if tvl_usd > TVL_TIER_HUNDRED_MILLION {
        3
    } else {
        10
    }
}

pub fn risk_level(score: u32) -> RiskLevel {
    match score {
        s if s <= LOW_RISK_MAX => RiskLevel::Low,
        s if s <= MEDIUM_RISK_MAX => RiskLevel::Medium,
        s if s <= HIGH_RISK_MAX => RiskLevel::High,
        _ => RiskLevel::VeryHigh,
    }
}

pub fn score_pool(input: &RiskInput<'_>, reference: &ReferenceData) -> RiskAssessment {
    let tvl = finite_or_zero(input.tvl_usd).max(0.0);
    let apy = finite_or_zero(input.apy);
    let apy_reward = finite_or_zero(input.apy_reward);

    let breakdown = RiskBreakdown {
        tvl: tvl_score(tvl),
        apy: apy_score(apy, apy_reward),
        stablecoin: stablecoin_score(
            input.stablecoin.unwrap_or(false),
            input.underlying_assets,
            reference,
        ),
        il: il_score(input.il_risk, input.exposure, input.underlying_assets, reference),
        protocol: protocol_score(input.project_slug, tvl, reference),
    };
    let score = breakdown.total();

    RiskAssessment {
        score,
        level: risk_level(score),
        breakdown,
    }
}
