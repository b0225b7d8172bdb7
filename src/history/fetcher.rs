//! Batched, bounded-concurrency history fetch feeding the stability analyzer.
//!
//! Up to `batch_size` requests are in flight at once. Batches are separated by
//! a fixed pause to stay under upstream rate limits. A pool whose history
//! cannot be fetched is recorded as failed and never aborts the run.

use std::collections::HashMap;
use std::time::Duration;
use futures::future::join_all;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;
use crate::{
    config::Config,
    history::{should_report, ProgressObserver},
    network::MarketDataSource,
    types::{ApyStability, ProcessedPool},
    volatility::StabilityAnalyzer,
};

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub tvl_floor_usd: f64,
    pub max_pools: usize,
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub request_timeout: Duration,
    pub window: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        FetcherConfig::from(&Config::default())
    }
}

impl From<&Config> for FetcherConfig {
    fn from(config: &Config) -> Self {
        Self {
            tvl_floor_usd: config.history_tvl_floor_usd,
            max_pools: config.history_max_pools,
            batch_size: config.history_batch_size.max(1),
            batch_delay: Duration::from_millis(config.history_batch_delay_ms),
            request_timeout: config.http_timeout(),
            window: config.stability_window,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchOutcome {
    Analyzed,
    InsufficientData,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolFetchResult {
    pub pool_id: String,
    pub outcome: FetchOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryFetchReport {
    pub stabilities: HashMap<String, ApyStability>,
    pub results: Vec<PoolFetchResult>,
    pub attempted: usize,
    pub analyzed: usize,
    pub insufficient: usize,
    pub failed: usize,
    pub batches: usize,
}

/// Pools at or above the floor, in caller order, capped at `max_pools`.
pub fn select_targets(pools: &[ProcessedPool], tvl_floor_usd: f64, max_pools: usize) -> Vec<&ProcessedPool> {
    pools
        .iter()
        .filter(|p| p.tvl_usd >= tvl_floor_usd)
        .take(max_pools)
        .collect()
}

pub struct HistoricalFetcher<'a, S: MarketDataSource + ?Sized> {
    source: &'a S,
    config: FetcherConfig,
    analyzer: StabilityAnalyzer,
}

impl<'a, S: MarketDataSource + ?Sized> HistoricalFetcher<'a, S> {
    pub fn new(source: &'a S, config: FetcherConfig) -> Self {
        let analyzer = StabilityAnalyzer::new(config.window);
        Self {
            source,
            config,
            analyzer,
        }
    }

    async fn analyze_pool(
        &self,
        pool_id: &str,
        results: &Mutex<HashMap<String, ApyStability>>,
    ) -> FetchOutcome {
        let fetched = tokio::time::timeout(
            self.config.request_timeout,
            self.source.fetch_pool_history(pool_id),
        )
        .await;

        let history = match fetched {
            Ok(Ok(history)) => history,
            Ok(Err(e)) => {
                debug!(pool_id, error = %e, "History fetch failed, treating as no data");
                return FetchOutcome::Failed;
            }
            Err(_) => {
                debug!(pool_id, "History fetch timed out, treating as no data");
                return FetchOutcome::Failed;
            }
        };

        match self.analyzer.analyze(&history) {
            Some(stability) => {
                results.lock().await.insert(pool_id.to_string(), stability);
                FetchOutcome::Analyzed
            }
            None => FetchOutcome::InsufficientData,
        }
    }

    pub async fn run(&self, pools: &[ProcessedPool], observer: &dyn ProgressObserver) -> HistoryFetchReport {
        let targets = select_targets(pools, self.config.tvl_floor_usd, self.config.max_pools);
        let total = targets.len();
        let batch_size = self.config.batch_size.max(1);
        let batch_count = total.div_ceil(batch_size);

        // join_all polls every fetch on this task; the lock only orders writes.
        let stabilities = Mutex::new(HashMap::with_capacity(total));
        let mut report = HistoryFetchReport {
            attempted: total,
            ..Default::default()
        };

        for (index, batch) in targets.chunks(batch_size).enumerate() {
            let outcomes = join_all(batch.iter().map(|pool| {
                let stabilities = &stabilities;
                async move {
                    let outcome = self.analyze_pool(&pool.id, stabilities).await;
                    (pool.id.clone(), outcome)
                }
            }))
            .await;

            let previous = report.results.len();
            for (pool_id, outcome) in outcomes {
                match outcome {
                    FetchOutcome::Analyzed => report.analyzed += 1,
                    FetchOutcome::InsufficientData => report.insufficient += 1,
                    FetchOutcome::Failed => report.failed += 1,
                }
                report.results.push(PoolFetchResult { pool_id, outcome });
            }
            report.batches += 1;

            if should_report(previous, report.results.len(), total) {
                observer.on_progress(report.results.len(), total, report.analyzed);
            }

            if index + 1 < batch_count && !self.config.batch_delay.is_zero() {
                tokio::time::sleep(self.config.batch_delay).await;
            }
        }

        report.stabilities = stabilities.into_inner();
        report
    }
}
