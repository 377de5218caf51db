//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for etflens.
#[derive(Debug, thiserror::Error)]
pub enum EtfLensError {
    #[error("market data provider error for {symbol}: {reason}")]
    Provider { symbol: String, reason: String },

    #[error("no data found for {symbol} between {start} and {end}")]
    NoData {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

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

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EtfLensError {
    pub fn provider(symbol: &str, reason: impl Into<String>) -> Self {
        EtfLensError::Provider {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        EtfLensError::InvalidRequest {
            reason: reason.into(),
        }
    }

    pub fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        EtfLensError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&EtfLensError> for std::process::ExitCode {
    fn from(err: &EtfLensError) -> Self {
        let code: u8 = match err {
            EtfLensError::Io(_) | EtfLensError::Report { .. } => 1,
            EtfLensError::ConfigParse { .. }
            | EtfLensError::ConfigMissing { .. }
            | EtfLensError::ConfigInvalid { .. } => 2,
            EtfLensError::Provider { .. } => 3,
            EtfLensError::NoData { .. } => 5,
            EtfLensError::InvalidRequest { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
