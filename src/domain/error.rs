//! Domain error types.
//!
//! The analytics functions themselves are total and never fail; these errors
//! only surface at the configuration and data boundaries.

/// Top-level error type for quantdash.
#[derive(Debug, thiserror::Error)]
pub enum QuantdashError {
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

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl QuantdashError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        QuantdashError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&QuantdashError> for std::process::ExitCode {
    fn from(err: &QuantdashError) -> Self {
        let code: u8 = match err {
            QuantdashError::Json(_) => 1,
            QuantdashError::ConfigParse { .. }
            | QuantdashError::ConfigMissing { .. }
            | QuantdashError::ConfigInvalid { .. } => 2,
            QuantdashError::Data { .. } => 3,
            QuantdashError::NoData { .. } | QuantdashError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
