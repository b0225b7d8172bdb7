//! APY history and stability types

use serde::{Deserialize, Serialize};

/// One observation from the per-pool history endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub apy: Option<f64>,
    #[serde(default)]
    pub tvl_usd: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApyTrend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApyStability {
    pub score: u32,
    pub volatility: f64,
    pub avg_apy: f64,
    pub min_apy: f64,
    pub max_apy: f64,
    pub trend: ApyTrend,
    pub data_points: usize,
}
