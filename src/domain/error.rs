//! Domain error types.
//!
//! The anomaly core itself is total; these errors come from the registry,
//! the quote feeds, configuration and export.

/// Top-level error type for quantis.
#[derive(Debug, thiserror::Error)]
pub enum QuantisError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("ticker already exists: {ticker}")]
    TickerExists { ticker: String },

    #[error("ticker not tracked: {ticker}")]
    TickerNotFound { ticker: String },

    #[error("invalid ticker symbol: {ticker:?}")]
    InvalidTicker { ticker: String },

    #[error("market data error for {ticker}: {reason}")]
    MarketData { ticker: String, reason: String },

    #[error("export to {path} failed: {reason}")]
    Export { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&QuantisError> for std::process::ExitCode {
    fn from(err: &QuantisError) -> Self {
        let code: u8 = match err {
            QuantisError::Io(_) | QuantisError::Export { .. } => 1,
            QuantisError::ConfigParse { .. } | QuantisError::ConfigInvalid { .. } => 2,
            QuantisError::Database { .. } | QuantisError::DatabaseQuery { .. } => 3,
            QuantisError::TickerExists { .. }
            | QuantisError::TickerNotFound { .. }
            | QuantisError::InvalidTicker { .. } => 4,
            QuantisError::MarketData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
