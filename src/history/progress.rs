//! Progress reporting for long history fetches

use tracing::info;

pub const PROGRESS_LOG_INTERVAL: usize = 100;

pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, processed: usize, total: usize, analyzed: usize);
}

/// Logs every `PROGRESS_LOG_INTERVAL` pools and on completion.
pub struct TracingProgress;

impl ProgressObserver for TracingProgress {
    fn on_progress(&self, processed: usize, total: usize, analyzed: usize) {
        info!("📈 Stability analysis: {}/{} pools ({} with history)", processed, total, analyzed);
    }
}

pub struct SilentProgress;

impl ProgressObserver for SilentProgress {
    fn on_progress(&self, _processed: usize, _total: usize, _analyzed: usize) {}
}

/// True when a batch moved `processed` across a reporting boundary or finished the run.
pub fn should_report(previous: usize, processed: usize, total: usize) -> bool {
    processed == total || processed / PROGRESS_LOG_INTERVAL > previous / PROGRESS_LOG_INTERVAL
}
