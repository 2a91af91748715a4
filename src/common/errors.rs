//! Error types for the application

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::OrderStage;

/// Result type alias using our ExchangeError
pub type Result<T> = std::result::Result<T, ExchangeError>;

/// Errors raised while decoding an alert message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Wrong field count, unknown action or unusable symbol
    #[error("Invalid alert format: {0}")]
    InvalidFormat(String),

    /// A numeric field did not parse or was not strictly positive
    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Errors raised while turning an instruction into a priced order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizeError {
    /// Bid/ask missing or non-positive
    #[error("No usable market data for {0}")]
    NoMarketData(String),

    /// The order price rounded to zero or below
    #[error("Invalid order price: {0}")]
    InvalidPrice(Decimal),

    /// Order value under the exchange floor
    #[error("Order value {notional} is below the minimum notional {minimum}")]
    BelowMinimumNotional { notional: Decimal, minimum: Decimal },

    /// Quantity or price arithmetic overflowed
    #[error("Order size out of range for {0}")]
    OutOfRange(String),
}

/// Signing faults. These indicate a programming error, never bad user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Failed to create HMAC: {0}")]
    InvalidKey(String),

    #[error("Refusing to sign invalid request: {0}")]
    InvalidRequest(String),
}

/// Exchange client errors
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Network failures and timeouts
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-200 response, body kept verbatim
    #[error("Exchange returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Invalid API response
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Authenticated endpoint called without credentials
    #[error("API credentials are not configured")]
    MissingCredentials,

    #[error(transparent)]
    Signature(#[from] SignatureError),
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::InvalidResponse(err.to_string())
    }
}

/// Audit log errors
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Audit log I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audit log CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
#[error("Configuration error: {0}")]
pub struct ConfigError(pub String);

/// Why an alert was not turned into a live order
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Size(#[from] SizeError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Exchange(ExchangeError),
}

impl From<ExchangeError> for PipelineError {
    fn from(err: ExchangeError) -> Self {
        match err {
            ExchangeError::Signature(e) => PipelineError::Signature(e),
            other => PipelineError::Exchange(other),
        }
    }
}

impl PipelineError {
    /// Last stage the order reached before it was rejected
    pub fn stage(&self) -> OrderStage {
        match self {
            PipelineError::Parse(_) => OrderStage::Received,
            PipelineError::Size(_) => OrderStage::Parsed,
            PipelineError::Signature(_) => OrderStage::Priced,
            PipelineError::Exchange(_) => OrderStage::Signed,
        }
    }

    /// Internal faults are reported as server errors rather than rejections
    pub fn is_internal(&self) -> bool {
        matches!(self, PipelineError::Signature(_))
    }
}
