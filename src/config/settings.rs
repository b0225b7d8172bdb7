//! Engine configuration settings and environment variable handling

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

// Pipeline defaults
pub const DEFAULT_YIELDS_API_URL: &str = "https://yields.llama.fi";
pub const DEFAULT_PROTOCOLS_API_URL: &str = "https://api.llama.fi";
pub const DEFAULT_MIN_POOL_TVL_USD: f64 = 10_000.0;
pub const DEFAULT_HISTORY_TVL_FLOOR_USD: f64 = 1_000_000.0;
pub const DEFAULT_HISTORY_MAX_POOLS: usize = 500;
pub const DEFAULT_HISTORY_BATCH_SIZE: usize = 10;
pub const DEFAULT_HISTORY_BATCH_DELAY_MS: u64 = 500;
pub const DEFAULT_STABILITY_WINDOW: usize = 30;
pub const DEFAULT_MIN_SPREAD_PCT: f64 = 1.0;
pub const DEFAULT_SPREAD_POSITION_USD: f64 = 10_000.0;
pub const DEFAULT_TOP_SPREADS: usize = 5;

// Ingestion bounds
pub const MAX_VALID_APY: f64 = 10_000.0;
pub const MIN_STABILITY_POINTS: usize = 7;
pub const MAX_HISTORY_BATCH_SIZE: usize = 50;

#[derive(Debug, Clone)]
pub struct Config {
    pub yields_api_url: String,
    pub protocols_api_url: String,
    pub http_timeout_secs: u64,
    pub bulk_fetch_max_attempts: u32,
    // Ingestion
    pub min_pool_tvl_usd: f64,
    // Historical fetch
    pub history_tvl_floor_usd: f64,
    pub history_max_pools: usize,
    pub history_batch_size: usize,
    pub history_batch_delay_ms: u64,
    pub stability_window: usize,
    // Spread detection
    pub min_spread_pct: f64,
    pub spread_position_usd: f64,
    pub spread_chain: Option<String>,
    pub spread_asset: Option<String>,
    // Runtime
    pub reference_data_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub refresh_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            yields_api_url: DEFAULT_YIELDS_API_URL.to_string(),
            protocols_api_url: DEFAULT_PROTOCOLS_API_URL.to_string(),
            http_timeout_secs: 15,
            bulk_fetch_max_attempts: 3,
            min_pool_tvl_usd: DEFAULT_MIN_POOL_TVL_USD,
            history_tvl_floor_usd: DEFAULT_HISTORY_TVL_FLOOR_USD,
            history_max_pools: DEFAULT_HISTORY_MAX_POOLS,
            history_batch_size: DEFAULT_HISTORY_BATCH_SIZE,
            history_batch_delay_ms: DEFAULT_HISTORY_BATCH_DELAY_MS,
            stability_window: DEFAULT_STABILITY_WINDOW,
            min_spread_pct: DEFAULT_MIN_SPREAD_PCT,
            spread_position_usd: DEFAULT_SPREAD_POSITION_USD,
            spread_chain: None,
            spread_asset: None,
            reference_data_path: None,
            output_dir: PathBuf::from("output"),
            refresh_interval_secs: 0,
        }
    }
}

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl Config {
    pub fn load() -> Self {
        let defaults = Self::default();
        Self {
            yields_api_url: non_empty("YIELDS_API_URL").unwrap_or(defaults.yields_api_url),
            protocols_api_url: non_empty("PROTOCOLS_API_URL").unwrap_or(defaults.protocols_api_url),
            http_timeout_secs: parsed("HTTP_TIMEOUT_SECS")
                .unwrap_or(defaults.http_timeout_secs)
                .max(1),
            bulk_fetch_max_attempts: parsed("BULK_FETCH_MAX_ATTEMPTS")
                .unwrap_or(defaults.bulk_fetch_max_attempts)
                .clamp(1, 10),
            min_pool_tvl_usd: parsed::<f64>("MIN_POOL_TVL_USD")
                .filter(|v| v.is_finite())
                .unwrap_or(defaults.min_pool_tvl_usd)
                .max(0.0),
            history_tvl_floor_usd: parsed::<f64>("HISTORY_TVL_FLOOR_USD")
                .filter(|v| v.is_finite())
                .unwrap_or(defaults.history_tvl_floor_usd)
                .max(0.0),
            history_max_pools: parsed("HISTORY_MAX_POOLS").unwrap_or(defaults.history_max_pools),
            history_batch_size: parsed("HISTORY_BATCH_SIZE")
                .unwrap_or(defaults.history_batch_size)
                .clamp(1, MAX_HISTORY_BATCH_SIZE),
            history_batch_delay_ms: parsed("HISTORY_BATCH_DELAY_MS")
                .unwrap_or(defaults.history_batch_delay_ms),
            stability_window: parsed("STABILITY_WINDOW")
                .unwrap_or(defaults.stability_window)
                .max(MIN_STABILITY_POINTS),
            min_spread_pct: parsed::<f64>("MIN_SPREAD_PCT")
                .filter(|v| v.is_finite())
                .unwrap_or(defaults.min_spread_pct)
                .max(0.0),
            spread_position_usd: parsed::<f64>("SPREAD_POSITION_USD")
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(defaults.spread_position_usd),
            spread_chain: non_empty("SPREAD_CHAIN"),
            spread_asset: non_empty("SPREAD_ASSET"),
            reference_data_path: non_empty("REFERENCE_DATA_PATH").map(PathBuf::from),
            output_dir: non_empty("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            refresh_interval_secs: parsed("REFRESH_INTERVAL_SECS")
                .unwrap_or(defaults.refresh_interval_secs),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
