//! Liquidity and exit-risk types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlippageEstimate {
    pub position_usd: f64,
    pub slippage_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitabilityRating {
    Excellent,
    Good,
    Moderate,
    Poor,
    VeryPoor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityRisk {
    pub score: u32,
    pub max_safe_allocation: f64,
    pub safe_allocation_percent: f64,
    pub slippage_estimates: Vec<SlippageEstimate>,
    pub exitability_rating: ExitabilityRating,
}

impl LiquidityRisk {
    pub fn slippage_at(&self, position_usd: f64) -> Option<f64> {
        self.slippage_estimates
            .iter()
            .find(|e| e.position_usd == position_usd)
            .map(|e| e.slippage_pct)
    }
}
