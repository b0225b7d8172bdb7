//! APY stability analysis over a fixed look-back window

use crate::config::MIN_STABILITY_POINTS;
use crate::types::{ApyStability, ApyTrend, HistoryPoint};
use crate::utils::{mean, population_std_dev, round2};

/// Below this average APY the relative CV explodes, so a scaled stddev is used.
pub const CV_MIN_AVERAGE_APY: f64 = 0.1;
pub const LOW_APY_CV_SCALE: f64 = 10.0;

/// Relative change between the opening and closing week that counts as a trend.
pub const TREND_THRESHOLD_PCT: f64 = 10.0;
pub const TREND_SEGMENT_LEN: usize = 7;

pub struct StabilityAnalyzer {
    window: usize,
}

impl Default for StabilityAnalyzer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_STABILITY_WINDOW)
    }
}

impl StabilityAnalyzer {
    pub fn new(window: usize) -> Self {
        StabilityAnalyzer {
            window: window.max(MIN_STABILITY_POINTS),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// `None` when fewer than seven usable observations exist.
    pub fn analyze(&self, history: &[HistoryPoint]) -> Option<ApyStability> {
        if history.len() < MIN_STABILITY_POINTS {
            return None;
        }

        let start = history.len().saturating_sub(self.window);
        let values: Vec<f64> = history[start..]
            .iter()
            .filter_map(|point| point.apy)
            .filter(|apy| apy.is_finite() && *apy >= 0.0)
            .collect();

        analyze_values(&values)
    }
}

/// Stability summary of an already-windowed APY series.
pub fn analyze_values(values: &[f64]) -> Option<ApyStability> {
    if values.len() < MIN_STABILITY_POINTS {
        return None;
    }

    let avg = mean(values);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let std_dev = population_std_dev(values);

    let cv = if avg > CV_MIN_AVERAGE_APY {
        (std_dev / avg) * 100.0
    } else {
        std_dev * LOW_APY_CV_SCALE
    };
    let score = (100.0 - cv).clamp(0.0, 100.0).round() as u32;

    Some(ApyStability {
        score,
        volatility: round2(std_dev),
        avg_apy: round2(avg),
        min_apy: round2(min),
        max_apy: round2(max),
        trend: detect_trend(values),
        data_points: values.len(),
    })
}

/// Compare the mean of the first and last week. The segments overlap on
/// short series.
pub fn detect_trend(values: &[f64]) -> ApyTrend {
    if values.len() < TREND_SEGMENT_LEN {
        return ApyTrend::Stable;
    }
    let first = mean(&values[..TREND_SEGMENT_LEN]);
    let last = mean(&values[values.len() - TREND_SEGMENT_LEN..]);

    if first > 0.0 {
        let change_pct = (last - first) / first * 100.0;
        if change_pct > TREND_THRESHOLD_PCT {
            ApyTrend::Up
        } else if change_pct < -TREND_THRESHOLD_PCT {
            ApyTrend::Down
        } else {
            ApyTrend::Stable
        }
    } else if last > 0.0 {
        ApyTrend::Up
    } else {
        ApyTrend::Stable
    }
}
