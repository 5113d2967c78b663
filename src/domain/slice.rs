//! Time-slice statistics snapshot types.
//!
//! A slice is one 15-minute (hour, quarter) window of one trading pair,
//! aggregated over an analysis period. Slices are produced by the upstream
//! analysis service and never mutated here; field names are part of that
//! contract.

use serde::{Deserialize, Serialize};

/// Immutable microstructure statistics for one (hour, quarter) window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceStatistics {
    /// Hour of day, 0-23.
    pub hour: u8,
    /// Quarter of the hour, 0-3.
    pub quarter: u8,
    pub candle_count: u32,
    pub atr_mean: f64,
    pub range_mean: f64,
    /// Body/range directionality, percent 0-100.
    pub body_range_mean: f64,
    pub noise_ratio_mean: f64,
    /// Normalized buy/sell pressure differential, roughly -1..1.
    pub volume_imbalance_mean: f64,
    /// Percent of candles closing beyond the moving average, 0-100.
    pub breakout_percentage: f64,
    /// Liquidity proxy, 0-100.
    pub tick_quality_mean: f64,
    /// Calendar event names associated with this window.
    #[serde(default)]
    pub events: Vec<String>,
}

impl SliceStatistics {
    /// Window label like "08:45", for display and stable tie-breaks.
    pub fn window_label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.quarter * 15)
    }
}

/// A slice with its straddle viability score and rank within one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSlice {
    pub stats: SliceStatistics,
    /// Always in [0, 100].
    pub straddle_score: f64,
    /// 1-based position after descending sort.
    pub rank: usize,
}
