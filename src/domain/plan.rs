//! Trading plan synthesis.
//!
//! When the backend supplies an authoritative parameter block it is
//! canonical: this module only derives recommendation and risk level from
//! the supplied confidence, and never recomputes sl/tp. The local estimator
//! is still run so that a large numeric divergence between the two paths is
//! surfaced to the caller rather than silently absorbed.

use serde::{Deserialize, Serialize};

use crate::domain::bands::{
    lookup, DURATION_ATR_BANDS, DURATION_DEFAULT_MINUTES, TICK_QUALITY_EXCELLENT,
    TICK_QUALITY_POOR,
};
use crate::domain::patterns::{ComboTier, DetectedTrap, GoldenCombo, TrapSeverity};
use crate::domain::slice::SliceStatistics;
use crate::domain::trailing::trailing_stop;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    Trade,
    Caution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Trade parameters supplied by the backend. Field names follow the
/// upstream payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthoritativeParams {
    pub offset_pips: f64,
    pub stop_loss_pips: f64,
    pub take_profit_pips: f64,
    pub trailing_stop_pips: f64,
    pub timeout_minutes: u32,
    pub risk_reward: String,
    pub confidence: f64,
}

/// Trade parameters derived by the local estimator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimatedParams {
    pub sl_pips: f64,
    pub tp_pips: f64,
    pub sl_points: f64,
    pub tp_points: f64,
    pub trailing_stop_pips: f64,
    pub position_size_pct: f64,
    pub risk_reward: String,
    pub win_probability: f64,
    pub avg_gain_r: f64,
    pub duration_minutes: u32,
}

/// Which path produced the plan's numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PlanSource {
    Authoritative(AuthoritativeParams),
    Estimated(EstimatedParams),
}

/// Reported when the backend parameters and the local estimate disagree by
/// more than [`DIVERGENCE_FACTOR`] in either direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanDivergence {
    pub estimated_sl_pips: f64,
    pub estimated_tp_pips: f64,
    /// estimated / authoritative
    pub sl_ratio: f64,
    pub tp_ratio: f64,
}

pub const DIVERGENCE_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradingPlan {
    pub source: PlanSource,
    pub confidence: f64,
    pub risk_level: RiskLevel,
    pub recommendation: Recommendation,
    pub divergence: Option<PlanDivergence>,
}

fn recommendation_for(confidence: f64) -> Recommendation {
    if confidence >= 75.0 {
        Recommendation::Trade
    } else {
        Recommendation::Caution
    }
}

fn risk_level_for(confidence: f64) -> RiskLevel {
    if confidence >= 75.0 {
        RiskLevel::Low
    } else if confidence >= 50.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

fn format_risk_reward(sl_pips: f64, tp_pips: f64) -> String {
    let ratio = if sl_pips > 0.0 { tp_pips / sl_pips } else { 0.0 };
    format!("1:{:.1}", ratio)
}

/// SL/TP ATR-multipliers and base position size by strongest combo tier.
fn tier_multipliers(tier: Option<ComboTier>) -> (f64, f64, f64) {
    match tier {
        Some(ComboTier::Jackpot) => (1.5, 3.5, 100.0),
        Some(ComboTier::Excellent) => (2.0, 3.0, 100.0),
        Some(ComboTier::Bon) => (2.5, 3.0, 75.0),
        _ => (3.0, 3.0, 50.0),
    }
}

fn position_size(base: f64, traps: &[DetectedTrap], tick_quality: f64) -> f64 {
    let mut size = base;

    // penalties by priority: one Critique penalty, else one Haute penalty
    if traps.iter().any(|t| t.severity == TrapSeverity::Critique) {
        size = (size - 25.0).max(25.0);
    } else if traps.iter().any(|t| t.severity == TrapSeverity::Haute) {
        size = (size - 15.0).max(50.0);
    }

    if tick_quality > TICK_QUALITY_EXCELLENT {
        size = (size + 20.0).min(150.0);
    }
    // hard override, not additive
    if tick_quality < TICK_QUALITY_POOR {
        size = 50.0;
    }

    size
}

fn estimate(
    stats: &SliceStatistics,
    combos: &[GoldenCombo],
    traps: &[DetectedTrap],
) -> EstimatedParams {
    let best = combos.iter().max_by_key(|c| c.tier);
    let (sl_mult, tp_mult, base_size) = tier_multipliers(best.map(|c| c.tier));

    let sl_pips = stats.atr_mean * sl_mult * 10_000.0;
    let tp_pips = stats.atr_mean * tp_mult * 10_000.0;

    let event = stats.events.first().map(String::as_str).unwrap_or("");

    EstimatedParams {
        sl_pips,
        tp_pips,
        sl_points: sl_pips * 10.0,
        tp_points: tp_pips * 10.0,
        trailing_stop_pips: trailing_stop(stats.atr_mean * 10_000.0, 0.0),
        position_size_pct: position_size(base_size, traps, stats.tick_quality_mean),
        risk_reward: format_risk_reward(sl_pips, tp_pips),
        win_probability: best.map(|c| c.win_rate).unwrap_or(50.0),
        avg_gain_r: best.map(|c| c.avg_gain_r).unwrap_or(1.0),
        duration_minutes: trade_duration(stats.atr_mean, event, stats.hour),
    }
}

fn divergence(auth: &AuthoritativeParams, est: &EstimatedParams) -> Option<PlanDivergence> {
    if auth.stop_loss_pips <= 0.0 || auth.take_profit_pips <= 0.0 {
        return None;
    }
    let sl_ratio = est.sl_pips / auth.stop_loss_pips;
    let tp_ratio = est.tp_pips / auth.take_profit_pips;
    let diverged = |r: f64| r > DIVERGENCE_FACTOR || r < 1.0 / DIVERGENCE_FACTOR;
    if diverged(sl_ratio) || diverged(tp_ratio) {
        Some(PlanDivergence {
            estimated_sl_pips: est.sl_pips,
            estimated_tp_pips: est.tp_pips,
            sl_ratio,
            tp_ratio,
        })
    } else {
        None
    }
}

/// Combine a scored slice, its matched patterns and an optional backend
/// parameter block into a trade plan.
pub fn synthesize(
    stats: &SliceStatistics,
    straddle_score: f64,
    combos: &[GoldenCombo],
    traps: &[DetectedTrap],
    authoritative: Option<AuthoritativeParams>,
) -> TradingPlan {
    match authoritative {
        Some(params) => {
            let est = estimate(stats, combos, traps);
            let confidence = params.confidence;
            TradingPlan {
                divergence: divergence(&params, &est),
                source: PlanSource::Authoritative(params),
                confidence,
                risk_level: risk_level_for(confidence),
                recommendation: recommendation_for(confidence),
            }
        }
        None => {
            let est = estimate(stats, combos, traps);
            TradingPlan {
                source: PlanSource::Estimated(est),
                confidence: straddle_score,
                risk_level: risk_level_for(straddle_score),
                recommendation: recommendation_for(straddle_score),
                divergence: None,
            }
        }
    }
}

/// Event-type duration factors; substring match, case-insensitive, first
/// match wins.
static EVENT_DURATION_FACTORS: [(&str, f64); 5] = [
    ("NFP", 1.5),
    ("FOMC", 1.4),
    ("BCE", 1.3),
    ("CPI", 1.2),
    ("PIB", 1.1),
];

fn hour_duration_factor(hour: u8) -> f64 {
    match hour {
        8 => 1.1,
        14 => 1.3,
        15 => 1.2,
        16 => 1.1,
        20 => 0.8,
        _ => 1.0,
    }
}

/// Expected trade duration in minutes: ATR band base, scaled by event type
/// and hour of day, rounded to the nearest minute.
pub fn trade_duration(atr: f64, event_type: &str, hour: u8) -> u32 {
    let base = {
        let banded = lookup(atr, &DURATION_ATR_BANDS);
        if banded > 0.0 { banded } else { DURATION_DEFAULT_MINUTES }
    };

    let upper = event_type.to_uppercase();
    let event_factor = EVENT_DURATION_FACTORS
        .iter()
        .find(|(key, _)| upper.contains(key))
        .map(|(_, f)| *f)
        .unwrap_or(1.0);

    (base * event_factor * hour_duration_factor(hour)).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::patterns::{detect_golden_combos, detect_traps};

    fn prime_slice() -> SliceStatistics {
        SliceStatistics {
            hour: 14,
            quarter: 2,
            candle_count: 120,
            atr_mean: 0.0022,
            range_mean: 0.0027,
            body_range_mean: 48.0,
            noise_ratio_mean: 1.2,
            volume_imbalance_mean: 0.45,
            breakout_percentage: 62.0,
            tick_quality_mean: 82.0,
            events: vec!["NFP".into()],
        }
    }

    fn quiet_slice() -> SliceStatistics {
        SliceStatistics {
            hour: 3,
            quarter: 0,
            candle_count: 80,
            atr_mean: 0.0012,
            range_mean: 0.0013,
            body_range_mean: 22.0,
            noise_ratio_mean: 2.2,
            volume_imbalance_mean: 0.05,
            breakout_percentage: 30.0,
            tick_quality_mean: 60.0,
            events: vec![],
        }
    }

    fn auth(confidence: f64) -> AuthoritativeParams {
        AuthoritativeParams {
            offset_pips: 5.0,
            stop_loss_pips: 30.0,
            take_profit_pips: 75.0,
            trailing_stop_pips: 22.0,
            timeout_minutes: 180,
            risk_reward: "1:2.5".into(),
            confidence,
        }
    }

    #[test]
    fn jackpot_combo_drives_multipliers() {
        let stats = prime_slice();
        let combos = detect_golden_combos(&stats);
        let traps = detect_traps(&stats);
        let plan = synthesize(&stats, 100.0, &combos, &traps, None);

        let PlanSource::Estimated(est) = &plan.source else {
            panic!("expected estimated plan");
        };
        // atr 0.0022: sl = 0.0022*1.5*10000 = 33, tp = 0.0022*3.5*10000 = 77
        assert!((est.sl_pips - 33.0).abs() < 1e-9);
        assert!((est.tp_pips - 77.0).abs() < 1e-9);
        assert!((est.sl_points - 330.0).abs() < 1e-9);
        assert_eq!(est.risk_reward, "1:2.3");
        assert!((est.win_probability - 78.0).abs() < f64::EPSILON);
        assert!((est.avg_gain_r - 2.6).abs() < f64::EPSILON);
        // base 100, no traps, tick quality 82 > 70 → 120
        assert!((est.position_size_pct - 120.0).abs() < f64::EPSILON);
        assert_eq!(plan.recommendation, Recommendation::Trade);
        assert_eq!(plan.risk_level, RiskLevel::Low);
    }

    #[test]
    fn no_combo_falls_back_to_neutral_defaults() {
        let stats = quiet_slice();
        let plan = synthesize(&stats, 32.0, &[], &[], None);

        let PlanSource::Estimated(est) = &plan.source else {
            panic!("expected estimated plan");
        };
        // sl = tp = 0.0012*3.0*10000 = 36
        assert!((est.sl_pips - 36.0).abs() < 1e-9);
        assert_eq!(est.risk_reward, "1:1.0");
        assert!((est.win_probability - 50.0).abs() < f64::EPSILON);
        assert!((est.avg_gain_r - 1.0).abs() < f64::EPSILON);
        assert!((est.position_size_pct - 50.0).abs() < f64::EPSILON);
        assert_eq!(plan.recommendation, Recommendation::Caution);
        assert_eq!(plan.risk_level, RiskLevel::High);
    }

    #[test]
    fn risk_reward_is_consistent_with_own_sl_tp() {
        for stats in [prime_slice(), quiet_slice()] {
            let combos = detect_golden_combos(&stats);
            let plan = synthesize(&stats, 50.0, &combos, &[], None);
            let PlanSource::Estimated(est) = &plan.source else {
                panic!("expected estimated plan");
            };
            let expected = format!("1:{:.1}", est.tp_pips / est.sl_pips);
            assert_eq!(est.risk_reward, expected);
        }
    }

    #[test]
    fn critique_trap_cuts_size() {
        let stats = quiet_slice();
        let traps = detect_traps(&SliceStatistics {
            atr_mean: 0.0025,
            body_range_mean: 15.0,
            ..quiet_slice()
        });
        assert!(traps.iter().any(|t| t.severity == TrapSeverity::Critique));

        let plan = synthesize(&stats, 40.0, &[], &traps, None);
        let PlanSource::Estimated(est) = &plan.source else {
            panic!("expected estimated plan");
        };
        // base 50 − 25, floored at 25
        assert!((est.position_size_pct - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn haute_trap_penalty_floors_at_fifty() {
        let combos = detect_golden_combos(&prime_slice());
        let traps = vec![DetectedTrap {
            name: "Chaos",
            severity: TrapSeverity::Haute,
            metric: "noise_ratio_mean",
            observed: 3.5,
            threshold: 3.0,
            recommendation: "",
        }];
        // tick quality 60 keeps the liquidity bonus out of the way
        let mut stats = prime_slice();
        stats.tick_quality_mean = 60.0;

        let plan = synthesize(&stats, 80.0, &combos, &traps, None);
        let PlanSource::Estimated(est) = &plan.source else {
            panic!("expected estimated plan");
        };
        // base 100 − 15 = 85
        assert!((est.position_size_pct - 85.0).abs() < f64::EPSILON);
    }

    #[test]
    fn poor_liquidity_forces_size_fifty() {
        let mut stats = prime_slice();
        stats.tick_quality_mean = 20.0;
        let combos = detect_golden_combos(&stats);
        let traps = detect_traps(&stats);

        let plan = synthesize(&stats, 90.0, &combos, &traps, None);
        let PlanSource::Estimated(est) = &plan.source else {
            panic!("expected estimated plan");
        };
        // hard override regardless of combo tier and penalties
        assert!((est.position_size_pct - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn authoritative_params_are_canonical() {
        let stats = prime_slice();
        let combos = detect_golden_combos(&stats);
        let plan = synthesize(&stats, 10.0, &combos, &[], Some(auth(80.0)));

        let PlanSource::Authoritative(params) = &plan.source else {
            panic!("expected authoritative plan");
        };
        assert!((params.stop_loss_pips - 30.0).abs() < f64::EPSILON);
        // confidence comes from the backend block, not the local score
        assert!((plan.confidence - 80.0).abs() < f64::EPSILON);
        assert_eq!(plan.recommendation, Recommendation::Trade);
        assert_eq!(plan.risk_level, RiskLevel::Low);
    }

    #[test]
    fn authoritative_confidence_tiers() {
        let stats = prime_slice();
        let plan = synthesize(&stats, 0.0, &[], &[], Some(auth(60.0)));
        assert_eq!(plan.recommendation, Recommendation::Caution);
        assert_eq!(plan.risk_level, RiskLevel::Medium);

        let plan = synthesize(&stats, 0.0, &[], &[], Some(auth(40.0)));
        assert_eq!(plan.risk_level, RiskLevel::High);
    }

    #[test]
    fn divergence_is_surfaced_not_resolved() {
        let stats = prime_slice();
        let combos = detect_golden_combos(&stats);
        // estimator says sl 33 / tp 77; authoritative block says 10 / 20
        let mut params = auth(90.0);
        params.stop_loss_pips = 10.0;
        params.take_profit_pips = 20.0;

        let plan = synthesize(&stats, 0.0, &combos, &[], Some(params));
        let div = plan.divergence.as_ref().expect("expected divergence");
        assert!((div.sl_ratio - 3.3).abs() < 1e-9);
        // authoritative numbers still win
        let PlanSource::Authoritative(p) = &plan.source else {
            panic!("expected authoritative plan");
        };
        assert!((p.stop_loss_pips - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn close_estimates_produce_no_divergence() {
        let stats = prime_slice();
        let combos = detect_golden_combos(&stats);
        let mut params = auth(90.0);
        params.stop_loss_pips = 30.0;
        params.take_profit_pips = 70.0;

        let plan = synthesize(&stats, 0.0, &combos, &[], Some(params));
        assert!(plan.divergence.is_none());
    }

    #[test]
    fn duration_atr_bands() {
        assert_eq!(trade_duration(0.006, "", 10), 120);
        assert_eq!(trade_duration(0.0045, "", 10), 150);
        assert_eq!(trade_duration(0.003, "", 10), 180);
        assert_eq!(trade_duration(0.001, "", 10), 240);
    }

    #[test]
    fn duration_event_factor_substring_first_match() {
        // "NFP" matches inside a longer label, case-insensitive
        assert_eq!(trade_duration(0.001, "nfp (non-farm payrolls)", 10), 360);
        assert_eq!(trade_duration(0.001, "Décision BCE", 10), 312);
        assert_eq!(trade_duration(0.001, "inconnu", 10), 240);
    }

    #[test]
    fn duration_hour_factor() {
        // 240 * 1.3 = 312 at 14h; 240 * 0.8 = 192 at 20h
        assert_eq!(trade_duration(0.001, "", 14), 312);
        assert_eq!(trade_duration(0.001, "", 20), 192);
    }

    #[test]
    fn duration_combined_factors_round_to_minute() {
        // 120 * 1.5 * 1.3 = 234
        assert_eq!(trade_duration(0.006, "NFP", 14), 234);
        // 240 * 1.1 * 1.1 = 290.4 → 290
        assert_eq!(trade_duration(0.001, "PIB T2", 8), 290);
    }
}
