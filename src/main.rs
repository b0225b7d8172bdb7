//! Yield Risk Engine - Main Entry Point

use yield_risk_engine::*;
use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use tokio::time;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = CONFIG.clone();

    utils::setup_output_directories(&config.output_dir)
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;
    let _logging_guard = utils::setup_logging(&config.output_dir)?;

    info!("📊 Yield Risk Engine v{}", env!("CARGO_PKG_VERSION"));
    info!("📋 Configuration:");
    info!("   Yields API: {}", config.yields_api_url);
    info!("   Protocols API: {}", config.protocols_api_url);
    info!("   Min Pool TVL: ${}", config.min_pool_tvl_usd);
    info!("   History: floor ${}, max {} pools, batch {} every {}ms",
        config.history_tvl_floor_usd,
        config.history_max_pools,
        config.history_batch_size,
        config.history_batch_delay_ms
    );
    info!("   Stability Window: {} points", config.stability_window);
    info!("   Min Spread: {}% on ${} positions", config.min_spread_pct, config.spread_position_usd);
    if let Some(chain) = &config.spread_chain {
        info!("   Spread Chain Filter: {}", chain);
    }
    if let Some(asset) = &config.spread_asset {
        info!("   Spread Asset Filter: {}", asset);
    }

    let reference = match &config.reference_data_path {
        Some(path) => {
            let reference = ReferenceData::from_file(path)?;
            info!("📚 Loaded reference data from {}", path.display());
            reference
        }
        None => ReferenceData::default(),
    };

    let client = network::YieldsClient::new(&config).context("Failed to build yields client")?;

    if config.refresh_interval_secs == 0 {
        run_once(&client, &config, &reference).await?;
        return Ok(());
    }

    info!("\n🚀 Refreshing every {}s, Ctrl+C to stop\n", config.refresh_interval_secs);
    let mut interval = time::interval(Duration::from_secs(config.refresh_interval_secs));
    let mut completed = 0u64;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match run_once(&client, &config, &reference).await {
                    Ok(()) => completed += 1,
                    Err(e) => error!("Analysis cycle error: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("\n📛 Received shutdown signal (Ctrl+C)...");
                break;
            }
        }
    }

    info!("Completed {} cycles, exiting", completed);
    Ok(())
}

async fn run_once(
    client: &network::YieldsClient,
    config: &Config,
    reference: &ReferenceData,
) -> Result<()> {
    let started = Instant::now();
    let report = pipeline::run_cycle(client, config, reference, &history::TracingProgress).await?;

    if let Err(e) = storage::save_cycle(&config.output_dir, &report) {
        warn!("⚠️ Failed to persist cycle {}: {}", report.cycle_id, e);
    }

    utils::print_cycle_summary(&report, started.elapsed());
    Ok(())
}
