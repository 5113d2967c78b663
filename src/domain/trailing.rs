//! Shared trailing-stop distance formula.
//!
//! Every component needing a trailing-stop distance goes through
//! [`trailing_stop`]; the formula exists exactly once.

/// Trailing-stop distance for a given ATR, widened when whipsaws are frequent.
///
/// `whipsaw_frequency` is the observed fraction of straddles where both legs
/// triggered (0 = never, 1 = every time). Result is rounded to one decimal,
/// half away from zero.
pub fn trailing_stop(atr: f64, whipsaw_frequency: f64) -> f64 {
    let raw = atr * 0.75 * (1.0 + whipsaw_frequency * 0.3);
    (raw * 10.0).round() / 10.0
}
