//! Configuration validation.
//!
//! Every config field is checked before a pipeline runs, so a bad value
//! fails fast with a precise message instead of surfacing mid-report.

use crate::domain::error::StraddleError;
use crate::ports::config_port::ConfigPort;

pub fn validate_costs_config(config: &dyn ConfigPort) -> Result<(), StraddleError> {
    validate_non_negative(config, "costs", "spread_pips")?;
    validate_non_negative(config, "costs", "slippage_pips")?;
    validate_positive(config, "costs", "stop_loss_pips", 30.0)?;
    validate_positive(config, "costs", "tp_rr", 2.5)?;
    Ok(())
}

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), StraddleError> {
    let pair = config.get_str("analysis", "pair");
    if pair.as_deref().map(str::trim).unwrap_or("").is_empty() {
        return Err(StraddleError::ConfigMissing {
            section: "analysis".to_string(),
            key: "pair".to_string(),
        });
    }

    let top_n = config.get_i64("analysis", "top_n", 5);
    if top_n < 1 {
        return Err(StraddleError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "top_n".to_string(),
            reason: "top_n must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_non_negative(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), StraddleError> {
    let value = config.get_f64(section, key, 0.0);
    if value < 0.0 {
        return Err(StraddleError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{key} must be non-negative"),
        });
    }
    Ok(())
}

fn validate_positive(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<(), StraddleError> {
    let value = config.get_f64(section, key, default);
    if value <= 0.0 {
        return Err(StraddleError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{key} must be positive"),
        });
    }
    Ok(())
}
