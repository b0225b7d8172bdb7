//! Pool-related types and structures

use serde::{Deserialize, Serialize};
use super::{ApyStability, LiquidityRisk};

/// A pool record as delivered by the yields aggregator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPool {
    #[serde(alias = "pool", default)]
    pub id: String,
    #[serde(default)]
    pub chain: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub tvl_usd: Option<f64>,
    #[serde(default)]
    pub apy: Option<f64>,
    #[serde(default)]
    pub apy_base: Option<f64>,
    #[serde(default)]
    pub apy_reward: Option<f64>,
    #[serde(default)]
    pub stablecoin: Option<bool>,
    #[serde(default)]
    pub il_risk: Option<String>,
    #[serde(default)]
    pub exposure: Option<String>,
    #[serde(default)]
    pub underlying_tokens: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    pub tvl: u32,
    pub apy: u32,
    pub stablecoin: u32,
    pub il: u32,
    pub protocol: u32,
}

impl RiskBreakdown {
    pub fn total(&self) -> u32 {
        self.tvl + self.apy + self.stablecoin + self.il + self.protocol
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolArchetype {
    Lending,
    LiquidStaking,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    Protocol,
    Asset,
    Oracle,
    Chain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyRisk {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(rename = "type")]
    pub dependency_type: DependencyType,
    pub name: String,
    pub risk: DependencyRisk,
}

/// A pool after normalization and risk annotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedPool {
    pub id: String,
    pub chain: String,
    pub project: String,
    pub project_slug: String,
    pub symbol: String,
    pub tvl_usd: f64,
    pub apy: f64,
    pub apy_base: f64,
    pub apy_reward: f64,
    pub stablecoin: bool,
    pub il_risk: Option<String>,
    pub exposure: Option<String>,
    pub underlying_tokens: Vec<String>,
    pub underlying_assets: Vec<String>,
    pub archetype: ProtocolArchetype,
    pub risk_score: u32,
    pub risk_level: RiskLevel,
    pub risk_breakdown: RiskBreakdown,
    pub liquidity_risk: LiquidityRisk,
    pub dependencies: Vec<Dependency>,
    pub apy_stability: Option<ApyStability>,
}
