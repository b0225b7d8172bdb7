//! Abstraction over the market data aggregator

use async_trait::async_trait;
use crate::errors::EngineResult;
use crate::types::{HistoryPoint, ProtocolRecord, RawPool};

#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Full pool list. Failure here is fatal to a cycle.
    async fn fetch_pools(&self) -> EngineResult<Vec<RawPool>>;

    /// Chronological APY/TVL history for one pool. An empty list is a normal answer.
    async fn fetch_pool_history(&self, pool_id: &str) -> EngineResult<Vec<HistoryPoint>>;

    async fn fetch_protocols(&self) -> EngineResult<Vec<ProtocolRecord>>;
}
