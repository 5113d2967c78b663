//! Declarative threshold band tables.
//!
//! Decision bands are data, not code: each table is an ordered list of
//! `(above, value)` pairs scanned top-down, first match wins, 0.0 (or the
//! stated default) when nothing matches. Keeping them here lets thresholds
//! be tested independently of the algorithms that consume them.

/// One descending band: applies when the observed value is strictly above
/// the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub above: f64,
    pub value: f64,
}

/// First band whose threshold the value exceeds, else 0.0.
pub fn lookup(value: f64, bands: &[Band]) -> f64 {
    bands
        .iter()
        .find(|b| value > b.above)
        .map(|b| b.value)
        .unwrap_or(0.0)
}

/// Range contribution to the step score, max 60 points.
pub const RANGE_SCORE_BANDS: [Band; 4] = [
    Band { above: 0.0025, value: 60.0 },
    Band { above: 0.0020, value: 50.0 },
    Band { above: 0.0015, value: 40.0 },
    Band { above: 0.0010, value: 20.0 },
];

/// ATR contribution to the step score, max 25 points.
pub const ATR_SCORE_BANDS: [Band; 4] = [
    Band { above: 0.0020, value: 25.0 },
    Band { above: 0.0015, value: 18.0 },
    Band { above: 0.0010, value: 12.0 },
    Band { above: 0.0005, value: 8.0 },
];

/// Body-range % contribution to the step score, max 15 points.
pub const BODY_SCORE_BANDS: [Band; 4] = [
    Band { above: 45.0, value: 15.0 },
    Band { above: 35.0, value: 10.0 },
    Band { above: 25.0, value: 6.0 },
    Band { above: 15.0, value: 3.0 },
];

/// Base trade duration in minutes by ATR; falls through to 240.
pub const DURATION_ATR_BANDS: [Band; 3] = [
    Band { above: 0.005, value: 120.0 },
    Band { above: 0.004, value: 150.0 },
    Band { above: 0.0025, value: 180.0 },
];

/// Default duration when no ATR band matches.
pub const DURATION_DEFAULT_MINUTES: f64 = 240.0;

/// Tick quality at or above which liquidity is considered excellent.
pub const TICK_QUALITY_EXCELLENT: f64 = 70.0;

/// Tick quality below which the spread makes the window untradable as-is.
pub const TICK_QUALITY_POOR: f64 = 40.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_picks_first_matching_band() {
        assert!((lookup(0.0030, &RANGE_SCORE_BANDS) - 60.0).abs() < f64::EPSILON);
        assert!((lookup(0.0021, &RANGE_SCORE_BANDS) - 50.0).abs() < f64::EPSILON);
        assert!((lookup(0.0016, &RANGE_SCORE_BANDS) - 40.0).abs() < f64::EPSILON);
        assert!((lookup(0.0011, &RANGE_SCORE_BANDS) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn lookup_below_all_bands_is_zero() {
        assert!((lookup(0.0005, &RANGE_SCORE_BANDS) - 0.0).abs() < f64::EPSILON);
        assert!((lookup(0.0001, &ATR_SCORE_BANDS) - 0.0).abs() < f64::EPSILON);
        assert!((lookup(10.0, &BODY_SCORE_BANDS) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn lookup_threshold_is_strict() {
        // exactly on a boundary falls through to the next band
        assert!((lookup(0.0025, &RANGE_SCORE_BANDS) - 50.0).abs() < f64::EPSILON);
        assert!((lookup(0.0010, &RANGE_SCORE_BANDS) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn atr_bands_golden_values() {
        assert!((lookup(0.0021, &ATR_SCORE_BANDS) - 25.0).abs() < f64::EPSILON);
        assert!((lookup(0.0016, &ATR_SCORE_BANDS) - 18.0).abs() < f64::EPSILON);
        assert!((lookup(0.0011, &ATR_SCORE_BANDS) - 12.0).abs() < f64::EPSILON);
        assert!((lookup(0.0006, &ATR_SCORE_BANDS) - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn body_bands_golden_values() {
        assert!((lookup(50.0, &BODY_SCORE_BANDS) - 15.0).abs() < f64::EPSILON);
        assert!((lookup(40.0, &BODY_SCORE_BANDS) - 10.0).abs() < f64::EPSILON);
        assert!((lookup(30.0, &BODY_SCORE_BANDS) - 6.0).abs() < f64::EPSILON);
        assert!((lookup(20.0, &BODY_SCORE_BANDS) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn duration_bands_golden_values() {
        assert!((lookup(0.006, &DURATION_ATR_BANDS) - 120.0).abs() < f64::EPSILON);
        assert!((lookup(0.0045, &DURATION_ATR_BANDS) - 150.0).abs() < f64::EPSILON);
        assert!((lookup(0.003, &DURATION_ATR_BANDS) - 180.0).abs() < f64::EPSILON);
        assert!((lookup(0.002, &DURATION_ATR_BANDS) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tables_are_descending() {
        for table in [
            &RANGE_SCORE_BANDS[..],
            &ATR_SCORE_BANDS[..],
            &BODY_SCORE_BANDS[..],
            &DURATION_ATR_BANDS[..],
        ] {
            for pair in table.windows(2) {
                assert!(pair[0].above > pair[1].above);
            }
        }
    }
}
