//! Golden-combo and trap detection.
//!
//! Rules are data: each combo is an AND-conjunction of threshold predicates
//! over slice metrics, each trap flags one degenerate regime. Tables are
//! scanned in definition order (highest combo tier first); multiple rules
//! may match the same slice. Tie-breaking between matched tiers happens
//! downstream, in plan synthesis.

use serde::Serialize;

use crate::domain::bands::{TICK_QUALITY_EXCELLENT, TICK_QUALITY_POOR};
use crate::domain::slice::SliceStatistics;

/// Combo confidence tiers, ascending so `max()` is the strongest match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ComboTier {
    Faible,
    Moyen,
    Bon,
    Excellent,
    Jackpot,
}

/// Trap severities, ascending so `max()` is the worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum TrapSeverity {
    Basse,
    Moyenne,
    Haute,
    Critique,
}

/// A slice metric a rule predicate can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Range,
    Atr,
    BodyRange,
    NoiseRatio,
    TickQuality,
    Breakout,
    VolumeImbalanceAbs,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Range => "range_mean",
            Metric::Atr => "atr_mean",
            Metric::BodyRange => "body_range_mean",
            Metric::NoiseRatio => "noise_ratio_mean",
            Metric::TickQuality => "tick_quality_mean",
            Metric::Breakout => "breakout_percentage",
            Metric::VolumeImbalanceAbs => "volume_imbalance_mean",
        }
    }

    fn extract(&self, stats: &SliceStatistics) -> f64 {
        match self {
            Metric::Range => stats.range_mean,
            Metric::Atr => stats.atr_mean,
            Metric::BodyRange => stats.body_range_mean,
            Metric::NoiseRatio => stats.noise_ratio_mean,
            Metric::TickQuality => stats.tick_quality_mean,
            Metric::Breakout => stats.breakout_percentage,
            Metric::VolumeImbalanceAbs => stats.volume_imbalance_mean.abs(),
        }
    }
}

/// One threshold predicate: metric strictly above or strictly below.
#[derive(Debug, Clone, Copy)]
pub struct Condition {
    pub metric: Metric,
    pub above: bool,
    pub threshold: f64,
}

impl Condition {
    fn holds(&self, stats: &SliceStatistics) -> bool {
        let value = self.metric.extract(stats);
        if self.above {
            value > self.threshold
        } else {
            value < self.threshold
        }
    }
}

const fn above(metric: Metric, threshold: f64) -> Condition {
    Condition { metric, above: true, threshold }
}

const fn below(metric: Metric, threshold: f64) -> Condition {
    Condition { metric, above: false, threshold }
}

struct ComboRule {
    name: &'static str,
    tier: ComboTier,
    win_rate: f64,
    avg_gain_r: f64,
    conditions: &'static [Condition],
}

/// Definition order is tier order, strongest first.
static COMBO_RULES: [ComboRule; 5] = [
    ComboRule {
        name: "Triple Alignement",
        tier: ComboTier::Jackpot,
        win_rate: 78.0,
        avg_gain_r: 2.6,
        conditions: &[
            above(Metric::Range, 0.0025),
            above(Metric::Atr, 0.0020),
            above(Metric::BodyRange, 45.0),
            below(Metric::NoiseRatio, 1.5),
            above(Metric::TickQuality, TICK_QUALITY_EXCELLENT),
        ],
    },
    ComboRule {
        name: "Momentum Propre",
        tier: ComboTier::Excellent,
        win_rate: 71.0,
        avg_gain_r: 2.1,
        conditions: &[
            above(Metric::Range, 0.0020),
            above(Metric::BodyRange, 40.0),
            below(Metric::NoiseRatio, 2.0),
            above(Metric::Breakout, 55.0),
        ],
    },
    ComboRule {
        name: "Poussée Directionnelle",
        tier: ComboTier::Bon,
        win_rate: 64.0,
        avg_gain_r: 1.7,
        conditions: &[
            above(Metric::Atr, 0.0015),
            above(Metric::BodyRange, 35.0),
            above(Metric::VolumeImbalanceAbs, 0.3),
        ],
    },
    ComboRule {
        name: "Volatilité Exploitable",
        tier: ComboTier::Moyen,
        win_rate: 57.0,
        avg_gain_r: 1.3,
        conditions: &[
            above(Metric::Range, 0.0015),
            above(Metric::Atr, 0.0010),
            below(Metric::NoiseRatio, 2.5),
        ],
    },
    ComboRule {
        name: "Frémissement",
        tier: ComboTier::Faible,
        win_rate: 52.0,
        avg_gain_r: 1.1,
        conditions: &[
            above(Metric::Range, 0.0010),
            above(Metric::Breakout, 45.0),
            above(Metric::BodyRange, 25.0),
        ],
    },
];

struct TrapRule {
    name: &'static str,
    severity: TrapSeverity,
    conditions: &'static [Condition],
    /// Index into `conditions` of the metric reported to the user.
    primary: usize,
    recommendation: &'static str,
}

static TRAP_RULES: [TrapRule; 5] = [
    TrapRule {
        name: "Faux Mouvement",
        severity: TrapSeverity::Critique,
        conditions: &[
            above(Metric::Atr, 0.0020),
            below(Metric::BodyRange, 20.0),
        ],
        primary: 1,
        recommendation: "Forte volatilité sans direction: réduire la taille ou passer la fenêtre",
    },
    TrapRule {
        name: "Chaos",
        severity: TrapSeverity::Haute,
        conditions: &[
            above(Metric::NoiseRatio, 3.0),
            below(Metric::Breakout, 40.0),
        ],
        primary: 0,
        recommendation: "Marché hachuré: élargir le trailing stop ou attendre une fenêtre plus propre",
    },
    TrapRule {
        name: "Spread Prohibitif",
        severity: TrapSeverity::Haute,
        conditions: &[below(Metric::TickQuality, TICK_QUALITY_POOR)],
        primary: 0,
        recommendation: "Liquidité insuffisante: le spread mange l'avantage, taille réduite imposée",
    },
    TrapRule {
        name: "Indécision",
        severity: TrapSeverity::Moyenne,
        conditions: &[
            below(Metric::VolumeImbalanceAbs, 0.1),
            below(Metric::Range, 0.0015),
        ],
        primary: 0,
        recommendation: "Pression acheteuse/vendeuse équilibrée: risque de double déclenchement",
    },
    TrapRule {
        name: "Range Insuffisant",
        severity: TrapSeverity::Basse,
        conditions: &[below(Metric::Range, 0.0010)],
        primary: 0,
        recommendation: "Amplitude trop faible pour couvrir les coûts: viser une autre fenêtre",
    },
];

/// A matched combo with its calibration figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoldenCombo {
    pub name: &'static str,
    pub tier: ComboTier,
    pub win_rate: f64,
    pub avg_gain_r: f64,
}

/// A matched trap with the offending metric and a corrective hint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedTrap {
    pub name: &'static str,
    pub severity: TrapSeverity,
    pub metric: &'static str,
    pub observed: f64,
    pub threshold: f64,
    pub recommendation: &'static str,
}

/// All combos whose every predicate holds, in definition order.
pub fn detect_golden_combos(stats: &SliceStatistics) -> Vec<GoldenCombo> {
    COMBO_RULES
        .iter()
        .filter(|rule| rule.conditions.iter().all(|c| c.holds(stats)))
        .map(|rule| GoldenCombo {
            name: rule.name,
            tier: rule.tier,
            win_rate: rule.win_rate,
            avg_gain_r: rule.avg_gain_r,
        })
        .collect()
}

/// All traps whose every predicate holds, in definition order.
pub fn detect_traps(stats: &SliceStatistics) -> Vec<DetectedTrap> {
    TRAP_RULES
        .iter()
        .filter(|rule| rule.conditions.iter().all(|c| c.holds(stats)))
        .map(|rule| {
            let primary = &rule.conditions[rule.primary];
            DetectedTrap {
                name: rule.name,
                severity: rule.severity,
                metric: primary.metric.name(),
                observed: primary.metric.extract(stats),
                threshold: primary.threshold,
                recommendation: rule.recommendation,
            }
        })
        .collect()
}
