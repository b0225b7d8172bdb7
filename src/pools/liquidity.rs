//! Liquidity depth and exit-risk modeling

use crate::config::ReferenceData;
use crate::types::{ExitabilityRating, LiquidityRisk, ProtocolArchetype, SlippageEstimate};
use crate::utils::round2;

// Price-impact multipliers relative to a constant-product AMM
pub const LENDING_SLIPPAGE_FACTOR: f64 = 0.5;
pub const LIQUID_STAKING_SLIPPAGE_FACTOR: f64 = 0.3;
pub const DEFAULT_SLIPPAGE_FACTOR: f64 = 1.0;

/// Convexity term: impact grows faster than linearly with position share.
pub const SLIPPAGE_CONVEXITY: f64 = 2.0;
pub const MAX_SLIPPAGE_PCT: f64 = 100.0;

pub const REFERENCE_POSITION_USD: f64 = 1_000_000.0;
pub const SLIPPAGE_NOTIONALS_USD: [f64; 5] = [100_000.0, 500_000.0, 1_000_000.0, 5_000_000.0, 10_000_000.0];

// Score adjustments
pub const LENDING_SCORE_ADJUSTMENT: i32 = -10;
pub const LIQUID_STAKING_SCORE_ADJUSTMENT: i32 = -15;
pub const HIGH_SLIPPAGE_PCT: f64 = 5.0;
pub const HIGH_SLIPPAGE_PENALTY: i32 = 10;
pub const LOW_SLIPPAGE_PCT: f64 = 0.5;
pub const LOW_SLIPPAGE_BONUS: i32 = -10;

pub fn classify_archetype(project_slug: &str, reference: &ReferenceData) -> ProtocolArchetype {
    let slug = project_slug.to_lowercase();
    if reference.lending_protocols.iter().any(|p| slug.contains(p.as_str())) {
        ProtocolArchetype::Lending
    } else if reference.liquid_staking_protocols.iter().any(|p| slug.contains(p.as_str())) {
        ProtocolArchetype::LiquidStaking
    } else {
        ProtocolArchetype::Other
    }
}

pub fn slippage_factor(archetype: ProtocolArchetype) -> f64 {
    match archetype {
        ProtocolArchetype::Lending => LENDING_SLIPPAGE_FACTOR,
        ProtocolArchetype::LiquidStaking => LIQUID_STAKING_SLIPPAGE_FACTOR,
        ProtocolArchetype::Other => DEFAULT_SLIPPAGE_FACTOR,
    }
}

/// Estimated slippage (percent) for entering or exiting `position_usd`.
pub fn estimate_slippage(position_usd: f64, tvl_usd: f64, factor: f64) -> f64 {
    if !(tvl_usd > 0.0) {
        return MAX_SLIPPAGE_PCT;
    }
    let ratio = position_usd / tvl_usd;
    let slippage = ratio * 100.0 * factor * (1.0 + ratio * SLIPPAGE_CONVEXITY);
    round2(slippage.min(MAX_SLIPPAGE_PCT))
}

pub fn safe_allocation_percent(tvl_usd: f64, archetype: ProtocolArchetype) -> f64 {
    let base = match tvl_usd {
        t if t >= 1_000_000_000.0 => 5.0,
        t if t >= 100_000_000.0 => 3.0,
        t if t >= 10_000_000.0 => 2.0,
        _ => 1.0,
    };
    if archetype == ProtocolArchetype::Lending {
        base * 2.0
    } else {
        base
    }
}

fn base_liquidity_score(tvl_usd: f64) -> i32 {
    match tvl_usd {
        t if t >= 1_000_000_000.0 => 5,
        t if t >= 500_000_000.0 => 10,
        t if t >= 100_000_000.0 => 20,
        t if t >= 50_000_000.0 => 30,
        t if t >= 10_000_000.0 => 45,
        t if t >= 5_000_000.0 => 60,
        t if t >= 1_000_000.0 => 75,
        _ => 90,
    }
}

pub fn exitability_rating(score: u32) -> ExitabilityRating {
    match score {
        s if s <= 15 => ExitabilityRating::Excellent,
        s if s <= 30 => ExitabilityRating::Good,
        s if s <= 50 => ExitabilityRating::Moderate,
        s if s <= 70 => ExitabilityRating::Poor,
        _ => ExitabilityRating::VeryPoor,
    }
}

pub fn assess_liquidity_risk(tvl_usd: f64, archetype: ProtocolArchetype) -> LiquidityRisk {
    let tvl = if tvl_usd.is_finite() { tvl_usd.max(0.0) } else { 0.0 };
    let factor = slippage_factor(archetype);

    let safe_allocation_percent = safe_allocation_percent(tvl, archetype);
    let max_safe_allocation = tvl * safe_allocation_percent / 100.0;

    let slippage_estimates: Vec<SlippageEstimate> = SLIPPAGE_NOTIONALS_USD
        .iter()
        .map(|&position_usd| SlippageEstimate {
            position_usd,
            slippage_pct: estimate_slippage(position_usd, tvl, factor),
        })
        .collect();
    let reference_slippage = estimate_slippage(REFERENCE_POSITION_USD, tvl, factor);

    let mut score = base_liquidity_score(tvl);
    score += match archetype {
        ProtocolArchetype::Lending => LENDING_SCORE_ADJUSTMENT,
        ProtocolArchetype::LiquidStaking => LIQUID_STAKING_SCORE_ADJUSTMENT,
        ProtocolArchetype::Other => 0,
    };
    if reference_slippage > HIGH_SLIPPAGE_PCT {
        score += HIGH_SLIPPAGE_PENALTY;
    } else if reference_slippage < LOW_SLIPPAGE_PCT {
        score += LOW_SLIPPAGE_BONUS;
    }
    let score = score.clamp(0, 100) as u32;

    LiquidityRisk {
        score,
        max_safe_allocation: round2(max_safe_allocation),
        safe_allocation_percent,
        slippage_estimates,
        exitability_rating: exitability_rating(score),
    }
}
