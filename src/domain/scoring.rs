//! Volatility scoring of time slices.
//!
//! Two variants share the same clamp contract, score ∈ [0, 100]:
//! - [`straddle_score`]: step-function over the band tables, used to pick
//!   the best windows within one analysis period.
//! - [`continuous_score`]: smooth blend, used for cross-archive ranking
//!   where step plateaus would produce too many ties.

use crate::domain::bands::{
    lookup, ATR_SCORE_BANDS, BODY_SCORE_BANDS, RANGE_SCORE_BANDS,
};
use crate::domain::slice::{ScoredSlice, SliceStatistics};

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Step-function straddle viability score.
///
/// A slice with no candles scores 0: no data, no opinion.
pub fn straddle_score(stats: &SliceStatistics) -> f64 {
    if stats.candle_count == 0 {
        return 0.0;
    }

    let score = lookup(stats.range_mean, &RANGE_SCORE_BANDS)
        + lookup(stats.atr_mean, &ATR_SCORE_BANDS)
        + lookup(stats.body_range_mean, &BODY_SCORE_BANDS);

    clamp_score(score)
}

/// Continuous score for cross-archive comparison.
///
/// `movement_bonus` is an externally supplied movement-quality score on a
/// 0-100 scale; when present it is blended in at 20% weight.
pub fn continuous_score(stats: &SliceStatistics, movement_bonus: Option<f64>) -> f64 {
    if stats.candle_count == 0 {
        return 0.0;
    }

    let atr_part = (stats.atr_mean * 2.0).min(30.0);
    let noise_part = (20.0 - stats.noise_ratio_mean * 5.0).max(0.0);
    let breakout_part = stats.breakout_percentage / 100.0 * 20.0;
    let body_part = stats.body_range_mean / 100.0 * 15.0;
    let imbalance_part = (stats.volume_imbalance_mean.abs() * 10.0).min(15.0);

    let score = clamp_score(atr_part + noise_part + breakout_part + body_part + imbalance_part);

    match movement_bonus {
        Some(bonus) => clamp_score(score * 0.8 + bonus * 0.2),
        None => score,
    }
}

/// Score every slice and return them sorted by score descending, rank
/// assigned 1-based. Ties keep (hour, quarter) order so identical inputs
/// always produce identical output.
pub fn rank_slices(slices: &[SliceStatistics]) -> Vec<ScoredSlice> {
    let mut scored: Vec<ScoredSlice> = slices
        .iter()
        .map(|s| ScoredSlice {
            straddle_score: straddle_score(s),
            stats: s.clone(),
            rank: 0,
        })
        .collect();

    scored.sort_by(|a, b| {
        b.straddle_score
            .partial_cmp(&a.straddle_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| (a.stats.hour, a.stats.quarter).cmp(&(b.stats.hour, b.stats.quarter)))
    });

    for (i, s) in scored.iter_mut().enumerate() {
        s.rank = i + 1;
    }
    scored
}

/// The N best-ranked slices.
pub fn top_n(scored: &[ScoredSlice], n: usize) -> &[ScoredSlice] {
    &scored[..n.min(scored.len())]
}
