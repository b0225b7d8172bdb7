//! HTTP client for the yields aggregator

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use crate::{
    config::Config,
    errors::{EngineError, EngineResult},
    network::{retry_with_backoff, MarketDataSource, RetryConfig},
    types::{HistoryPoint, ProtocolRecord, RawPool},
};

#[derive(Deserialize)]
struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

pub struct YieldsClient {
    client: reqwest::Client,
    yields_base_url: String,
    protocols_base_url: String,
    bulk_retry: RetryConfig,
}

impl YieldsClient {
    pub fn new(config: &Config) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| EngineError::Network {
                message: "Failed to build HTTP client".to_string(),
                source: Some(e.into()),
                retry_count: 0,
            })?;

        Ok(Self {
            client,
            yields_base_url: config.yields_api_url.trim_end_matches('/').to_string(),
            protocols_base_url: config.protocols_api_url.trim_end_matches('/').to_string(),
            bulk_retry: RetryConfig {
                max_attempts: config.bulk_fetch_max_attempts,
                ..Default::default()
            },
        })
    }

    pub fn with_bulk_retry(mut self, retry: RetryConfig) -> Self {
        self.bulk_retry = retry;
        self
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> EngineResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| EngineError::Network {
                message: format!("GET {} failed", url),
                source: Some(e.into()),
                retry_count: 0,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| EngineError::Network {
            message: format!("Failed to read body from {}", url),
            source: Some(e.into()),
            retry_count: 0,
        })?;

        serde_json::from_str(&body)
            .with_context(|| format!("Unexpected payload from {}", url))
            .map_err(|source| EngineError::DataParsing {
                context: url.to_string(),
                source,
            })
    }
}

/// Parse each record on its own so one bad entry cannot sink the whole list.
/// A record that does not parse is kept as an empty pool, which ingestion
/// validation then counts as invalid. Returns the pools and the number of
/// unparseable records.
pub fn parse_pool_records(records: Vec<serde_json::Value>) -> (Vec<RawPool>, usize) {
    let mut unparseable = 0;
    let pools = records
        .into_iter()
        .map(|record| {
            serde_json::from_value::<RawPool>(record).unwrap_or_else(|e| {
                debug!(error = %e, "Unparseable pool record");
                unparseable += 1;
                RawPool::default()
            })
        })
        .collect();
    (pools, unparseable)
}

#[async_trait]
impl MarketDataSource for YieldsClient {
    async fn fetch_pools(&self) -> EngineResult<Vec<RawPool>> {
        let url = format!("{}/pools", self.yields_base_url);
        let envelope: DataEnvelope<serde_json::Value> =
            retry_with_backoff(|| self.get_json(&url), &self.bulk_retry, "pool list fetch").await?;

        let (pools, unparseable) = parse_pool_records(envelope.data);
        if unparseable > 0 {
            warn!(unparseable, "⚠️ Pool list contained malformed records");
        }
        info!("✅ Fetched {} pools from {}", pools.len(), url);
        Ok(pools)
    }

    async fn fetch_pool_history(&self, pool_id: &str) -> EngineResult<Vec<HistoryPoint>> {
        let url = format!("{}/chart/{}", self.yields_base_url, pool_id);
        let envelope: DataEnvelope<HistoryPoint> = self.get_json(&url).await?;
        debug!(pool_id, points = envelope.data.len(), "Fetched pool history");
        Ok(envelope.data)
    }

    async fn fetch_protocols(&self) -> EngineResult<Vec<ProtocolRecord>> {
        let url = format!("{}/protocols", self.protocols_base_url);
        let protocols: Vec<ProtocolRecord> =
            retry_with_backoff(|| self.get_json(&url), &self.bulk_retry, "protocol list fetch").await?;

        info!("✅ Fetched {} protocols", protocols.len());
        Ok(protocols)
    }
}
