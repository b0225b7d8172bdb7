//! Cross-protocol yield spread types

use serde::Serialize;
use super::RiskLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Stablecoin,
    Volatile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadConfidence {
    High,
    Medium,
    Low,
}

/// One side of a spread.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadLeg {
    pub pool_id: String,
    pub protocol: String,
    pub chain: String,
    pub symbol: String,
    pub apy: f64,
    pub apy_base: f64,
    pub apy_reward: f64,
    pub tvl: f64,
    pub risk_score: u32,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldSpread {
    pub asset: String,
    pub asset_type: AssetType,
    pub high_pool: SpreadLeg,
    pub low_pool: SpreadLeg,
    pub apy_spread: f64,
    pub apy_spread_percent: f64,
    pub risk_adjusted_spread: f64,
    pub base_apy_spread: f64,
    pub is_base_apy_driven: bool,
    pub min_liquidity: f64,
    pub estimated_slippage: f64,
    pub net_spread: f64,
    pub confidence: SpreadConfidence,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SpreadReport {
    pub spreads: Vec<YieldSpread>,
    pub top: Vec<YieldSpread>,
}
