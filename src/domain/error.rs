//! Domain error types.

/// Top-level error type for samtool.
#[derive(Debug, thiserror::Error)]
pub enum SamToolError {
    #[error("insufficient data: have {rows} rows, need {minimum}")]
    InsufficientData { rows: usize, minimum: usize },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("portfolio variance is negative ({variance})")]
    NegativeVariance { variance: f64 },

    #[error("no portfolios to select from")]
    EmptyInput,

    #[error("sample count must be at least 1")]
    InvalidSampleCount,

    #[error("non-positive price {price} for {symbol} at row {row}")]
    NonPositivePrice {
        symbol: String,
        row: usize,
        price: f64,
    },

    #[error("invalid weights: {reason}")]
    InvalidWeights { reason: String },

    #[error("price table has no assets")]
    NoAssets,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("unknown risk profile: {0}")]
    UnknownRiskProfile(String),

    #[error("insufficient funds to invest: net worth {net_worth:.2}")]
    InsufficientFunds { net_worth: f64 },

    #[error("price data error for {symbol}: {reason}")]
    PriceData { symbol: String, reason: String },

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

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SamToolError> for std::process::ExitCode {
    fn from(err: &SamToolError) -> Self {
        let code: u8 = match err {
            SamToolError::Io(_) => 1,
            SamToolError::ConfigParse { .. }
            | SamToolError::ConfigMissing { .. }
            | SamToolError::ConfigInvalid { .. } => 2,
            SamToolError::PriceData { .. }
            | SamToolError::NonPositivePrice { .. }
            | SamToolError::DuplicateSymbol(_)
            | SamToolError::NoAssets
            | SamToolError::InsufficientData { .. } => 3,
            SamToolError::DimensionMismatch { .. }
            | SamToolError::InvalidWeights { .. }
            | SamToolError::InvalidSampleCount
            | SamToolError::UnknownRiskProfile(_)
            | SamToolError::InsufficientFunds { .. } => 4,
            SamToolError::NegativeVariance { .. } | SamToolError::EmptyInput => 5,
        };
        std::process::ExitCode::from(code)
    }
}
