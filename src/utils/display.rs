//! Display and printing utilities

use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{info, warn};
use crate::{
    pipeline::CycleReport,
    types::{RiskLevel, YieldSpread},
};

pub fn risk_level_distribution(report: &CycleReport) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for pool in &report.pools {
        let label = match pool.risk_level {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very_high",
        };
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

pub fn print_cycle_summary(report: &CycleReport, elapsed: Duration) {
    info!("\n📊 Cycle {} ({:.1}s)", report.cycle_id, elapsed.as_secs_f64());
    info!("   📥 INGESTION:");
    info!("     Raw pools: {}", report.processing.input);
    info!("     Kept: {}", report.processing.kept);
    info!("     Dropped (invalid / below floor): {} / {}",
        report.processing.dropped_invalid,
        report.processing.dropped_below_floor
    );

    info!("   ⚠️  RISK LEVELS:");
    for (level, count) in risk_level_distribution(report) {
        info!("     {}: {}", level, count);
    }

    info!("   📈 STABILITY:");
    info!("     Attempted: {}", report.history.attempted);
    info!("     Analyzed: {}", report.history.analyzed);
    info!("     Insufficient data: {}", report.history.insufficient);
    info!("     Failed fetches: {}", report.history.failed);

    info!("   🔗 RELATIONSHIPS: {}", report.relationships.len());
    info!("   💱 SPREADS: {}", report.spreads.spreads.len());
    for (rank, spread) in report.spreads.top.iter().enumerate() {
        print_yield_spread(rank + 1, spread);
    }
    info!("");
}

pub fn print_yield_spread(rank: usize, spread: &YieldSpread) {
    warn!("\n🎯 SPREAD #{} {} ({:?})", rank, spread.asset, spread.asset_type);
    warn!("   High: {} {} @ {:.2}% (TVL ${:.0}, risk {})",
        spread.high_pool.protocol,
        spread.high_pool.chain,
        spread.high_pool.apy,
        spread.high_pool.tvl,
        spread.high_pool.risk_score
    );
    warn!("   Low:  {} {} @ {:.2}% (TVL ${:.0}, risk {})",
        spread.low_pool.protocol,
        spread.low_pool.chain,
        spread.low_pool.apy,
        spread.low_pool.tvl,
        spread.low_pool.risk_score
    );
    warn!("   Spread: {:.2} pts | Net: {:.2} pts | Base-driven: {} | Confidence: {:?}",
        spread.apy_spread,
        spread.net_spread,
        spread.is_base_apy_driven,
        spread.confidence
    );
}
