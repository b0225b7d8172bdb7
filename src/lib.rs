//! Yield Risk Engine - DeFi yield pool analytics
//!
//! Pulls the pool list from a yield aggregator, scores every pool for risk and
//! exit liquidity, measures APY stability from pool history, detects same-asset
//! yield spreads across protocols and maps relationships between protocols.

pub mod config;
pub mod types;
pub mod errors;
pub mod network;
pub mod assets;
pub mod risk;
pub mod pools;
pub mod volatility;
pub mod history;
pub mod spreads;
pub mod relationships;
pub mod pipeline;
pub mod utils;
pub mod storage;

// Re-export commonly used items
pub use config::{Config, ReferenceData, CONFIG};
pub use errors::{EngineError, EngineResult};
pub use types::*;
