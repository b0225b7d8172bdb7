//! One pass over the aggregator: bulk list, scoring, history, spreads, graph.

use std::collections::HashMap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;
use crate::{
    config::{Config, ReferenceData},
    errors::EngineResult,
    history::{FetcherConfig, HistoricalFetcher, HistoryFetchReport, ProgressObserver},
    network::MarketDataSource,
    pools::{process_pools, ProcessingSummary},
    relationships::build_relationships,
    spreads::{detect_spreads, SpreadFilters},
    types::{ApyStability, ProcessedPool, ProtocolRelationship, SpreadReport},
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    pub cycle_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub processing: ProcessingSummary,
    pub history: HistoryFetchReport,
    pub pools: Vec<ProcessedPool>,
    pub spreads: SpreadReport,
    pub relationships: Vec<ProtocolRelationship>,
}

/// Attach stability results by pool id. Returns how many pools were updated.
pub fn merge_stability(pools: &mut [ProcessedPool], stabilities: &HashMap<String, ApyStability>) -> usize {
    let mut merged = 0;
    for pool in pools.iter_mut() {
        if let Some(stability) = stabilities.get(&pool.id) {
            pool.apy_stability = Some(stability.clone());
            merged += 1;
        }
    }
    merged
}

pub async fn run_cycle<S: MarketDataSource + ?Sized>(
    source: &S,
    config: &Config,
    reference: &ReferenceData,
    observer: &dyn ProgressObserver,
) -> EngineResult<CycleReport> {
    let cycle_id = Uuid::new_v4();
    let started_at = Utc::now();
    info!(%cycle_id, "🔄 Starting analysis cycle");

    // The bulk list is the only fatal dependency.
    let raw_pools = source.fetch_pools().await?;
    let (mut pools, processing) = process_pools(&raw_pools, config.min_pool_tvl_usd, reference);
    drop(raw_pools);

    let fetcher = HistoricalFetcher::new(source, FetcherConfig::from(config));
    let history = fetcher.run(&pools, observer).await;
    let merged = merge_stability(&mut pools, &history.stabilities);
    info!(merged, failed = history.failed, "Merged APY stability into pool set");

    let spreads = detect_spreads(&pools, &SpreadFilters::from(config), reference);

    let relationships = match source.fetch_protocols().await {
        Ok(protocols) => build_relationships(&protocols, reference),
        Err(e) => {
            warn!("⚠️ Protocol list unavailable, skipping relationship graph: {}", e);
            Vec::new()
        }
    };

    Ok(CycleReport {
        cycle_id,
        started_at,
        processing,
        history,
        pools,
        spreads,
        relationships,
    })
}
