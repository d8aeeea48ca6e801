//! Domain error types.
//!
//! The analysis pipeline itself never fails; these cover the outer layers
//! (configuration, data loading, report output).

/// Top-level error type for mastrader.
#[derive(Debug, thiserror::Error)]
pub enum MastraderError {
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

    #[error("data source error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("bars for {symbol} are not in timestamp order at index {index}")]
    UnorderedBars { symbol: String, index: usize },

    #[error("bar {index} for {symbol} has a non-finite {field}")]
    NonFiniteBar {
        symbol: String,
        index: usize,
        field: &'static str,
    },

    #[error("invalid symbol list: {reason}")]
    InvalidSymbols { reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MastraderError> for std::process::ExitCode {
    fn from(err: &MastraderError) -> Self {
        let code: u8 = match err {
            MastraderError::Io(_) | MastraderError::Json(_) => 1,
            MastraderError::ConfigParse { .. }
            | MastraderError::ConfigMissing { .. }
            | MastraderError::ConfigInvalid { .. }
            | MastraderError::InvalidSymbols { .. } => 2,
            MastraderError::Data { .. }
            | MastraderError::UnorderedBars { .. }
            | MastraderError::NonFiniteBar { .. } => 3,
            MastraderError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
