//! Cross-event tradability ranking.
//!
//! Consumes per-event-type aggregates produced upstream and derives a
//! composite tradability score blending confidence, timing consistency and
//! impact magnitude.

use serde::{Deserialize, Serialize};

/// Per economic-event-type aggregate from the upstream statistics feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStats {
    pub name: String,
    pub avg_atr: f64,
    /// Minutes from release to volatility peak.
    pub avg_peak_delay: f64,
    /// 0..1.
    pub avg_confidence: f64,
    pub variance: Option<f64>,
    /// 0..100 impact magnitude from the heatmap, when available.
    pub heatmap_impact: Option<f64>,
}

/// Composite tradability score in [0, 100].
///
/// Stability penalizes events whose peak-delay variance is large relative
/// to the delay itself; an event with no variance data is assumed stable.
pub fn tradability_score(stats: &EventStats) -> f64 {
    let stability = match stats.variance {
        Some(variance) if stats.avg_peak_delay > 0.0 => {
            (1.0 - variance / stats.avg_peak_delay).max(0.0)
        }
        Some(_) => 0.0,
        None => 1.0,
    };

    let score = 100.0 * stats.avg_confidence.min(1.0) * 0.4
        + stability * 100.0 * 0.3
        + stats.heatmap_impact.unwrap_or(0.0) * 0.3;

    score.clamp(0.0, 100.0)
}

/// Four fixed rating tiers over confidence × 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PairRating {
    Excellente,
    Bonne,
    Moyenne,
    Faible,
}

impl PairRating {
    pub fn label(&self) -> &'static str {
        match self {
            PairRating::Excellente => "Excellente",
            PairRating::Bonne => "Bonne",
            PairRating::Moyenne => "Moyenne",
            PairRating::Faible => "Faible",
        }
    }
}

pub fn pair_rating(confidence: f64) -> PairRating {
    let score = confidence * 100.0;
    if score >= 80.0 {
        PairRating::Excellente
    } else if score >= 65.0 {
        PairRating::Bonne
    } else if score >= 50.0 {
        PairRating::Moyenne
    } else {
        PairRating::Faible
    }
}

/// An event with its derived score, for ranked display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEvent {
    pub stats: EventStats,
    pub tradability: f64,
}

/// Rank events by tradability descending; ties keep name order so the
/// ranking is deterministic.
pub fn rank_events(events: &[EventStats]) -> Vec<RankedEvent> {
    let mut ranked: Vec<RankedEvent> = events
        .iter()
        .map(|e| RankedEvent {
            tradability: tradability_score(e),
            stats: e.clone(),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.tradability
            .partial_cmp(&a.tradability)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.stats.name.cmp(&b.stats.name))
    });
    ranked
}
