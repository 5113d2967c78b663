//! Domain error types.

/// Top-level error type for straddlelab.
#[derive(Debug, thiserror::Error)]
pub enum StraddleError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("no slices for pair {pair}")]
    NoSlices { pair: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StraddleError> for std::process::ExitCode {
    fn from(err: &StraddleError) -> Self {
        let code: u8 = match err {
            StraddleError::Io(_) => 1,
            StraddleError::ConfigParse { .. }
            | StraddleError::ConfigMissing { .. }
            | StraddleError::ConfigInvalid { .. } => 2,
            StraddleError::Data { .. } | StraddleError::MalformedRecord { .. } => 3,
            StraddleError::NoSlices { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitCode;

    #[test]
    fn config_missing_message() {
        let err = StraddleError::ConfigMissing {
            section: "costs".into(),
            key: "spread_pips".into(),
        };
        let _code: ExitCode = (&err).into();
        assert_eq!(err.to_string(), "missing config key [costs] spread_pips");
    }

    #[test]
    fn malformed_record_message() {
        let err = StraddleError::MalformedRecord {
            line: 7,
            reason: "bad date".into(),
        };
        assert_eq!(err.to_string(), "malformed record at line 7: bad date");
    }

    #[test]
    fn no_slices_message() {
        let err = StraddleError::NoSlices {
            pair: "EURUSD".into(),
        };
        assert_eq!(err.to_string(), "no slices for pair EURUSD");
    }
}
