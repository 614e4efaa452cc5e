//! Error types for the application
//!
//! Two families live here: [`ClientError`] for collaborators (venue REST API,
//! notification channel, configuration) and the pipeline taxonomy
//! ([`SignalError`], [`SizingError`], [`QuantizeError`], [`ValidationError`])
//! which every request-level rejection is expressed in. Collaborator errors are
//! converted at the boundary and never appear inside the pipeline taxonomy.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using our ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

/// Error type for collaborator operations (HTTP, channels, configuration)
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Venue answered with a non-zero return code
    #[error("Venue error {code}: {message}")]
    Venue { code: i64, message: String },

    /// Rate limiting errors
    #[error("Rate limit exceeded: {message}, retry after {retry_after_seconds:?} seconds")]
    RateLimit {
        message: String,
        retry_after_seconds: Option<u64>,
    },

    /// Invalid API response
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Instrument not listed on the venue
    #[error("Instrument not found: {0}")]
    InstrumentNotFound(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Configuration(format!("invalid URL: {}", err))
    }
}

/// Signal decoding and validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// Required field absent from every decode candidate
    #[error("missing required field `{0}`")]
    Missing(&'static str),

    /// Field present but could not be parsed
    #[error("malformed field `{0}`")]
    Malformed(&'static str),

    /// Entry and stop coincide, risk per unit is zero
    #[error("entry equals stop, risk per unit is undefined")]
    DegenerateRisk,
}

/// Sizing failures: degenerate prices or unusable policy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizingError {
    #[error("distance between entry and stop is zero")]
    ZeroRiskDistance,

    #[error("entry price is zero")]
    ZeroEntryPrice,

    /// No budget is configured, nothing bounds the quantity
    #[error("sizing policy has no budget configured")]
    NoBudgetConfigured,

    /// A configured budget is zero or negative
    #[error("budget `{name}` must be positive, got {value}")]
    InvalidBudget { name: &'static str, value: Decimal },

    #[error("arithmetic overflow while sizing")]
    Overflow,
}

/// Quantization failures caused by unusable precision data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantizeError {
    /// Step size is zero or negative
    #[error("invalid {kind} step {step}")]
    InvalidStep { kind: &'static str, step: Decimal },

    #[error("arithmetic overflow quantizing {value} to step {step}")]
    Overflow { value: Decimal, step: Decimal },
}

/// Venue-limit violations detected after quantization
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{symbol}: quantity {quantity} is not positive")]
    NonPositiveQuantity { symbol: String, quantity: Decimal },

    #[error("{symbol}: quantity {quantity} below minimum {min_qty}")]
    BelowMinQuantity {
        symbol: String,
        quantity: Decimal,
        min_qty: Decimal,
    },

    #[error("{symbol}: quantity {quantity} above maximum {max_qty}")]
    AboveMaxQuantity {
        symbol: String,
        quantity: Decimal,
        max_qty: Decimal,
    },

    #[error("{symbol}: notional {notional} below minimum {min_notional}")]
    BelowMinNotional {
        symbol: String,
        notional: Decimal,
        min_notional: Decimal,
    },
}

/// Any failure terminating a single pipeline run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error(transparent)]
    Sizing(#[from] SizingError),

    #[error(transparent)]
    Quantize(#[from] QuantizeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unexpected failure; details stay in the local log
    #[error("internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    /// Stable machine-readable code for responses and notifications
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Signal(SignalError::Missing(_)) => "missing_field",
            PipelineError::Signal(SignalError::Malformed(_)) => "malformed_field",
            PipelineError::Signal(SignalError::DegenerateRisk) => "degenerate_risk",
            PipelineError::Sizing(SizingError::ZeroRiskDistance) => "zero_risk_distance",
            PipelineError::Sizing(SizingError::ZeroEntryPrice) => "zero_entry_price",
            PipelineError::Sizing(SizingError::NoBudgetConfigured) => "no_budget_configured",
            PipelineError::Sizing(SizingError::InvalidBudget { .. }) => "invalid_budget",
            PipelineError::Sizing(SizingError::Overflow) => "sizing_overflow",
            PipelineError::Quantize(QuantizeError::InvalidStep { .. }) => "invalid_step",
            PipelineError::Quantize(QuantizeError::Overflow { .. }) => "quantize_overflow",
            PipelineError::Validation(ValidationError::NonPositiveQuantity { .. }) => {
                "non_positive_quantity"
            }
            PipelineError::Validation(ValidationError::BelowMinQuantity { .. }) => {
                "below_min_quantity"
            }
            PipelineError::Validation(ValidationError::AboveMaxQuantity { .. }) => {
                "above_max_quantity"
            }
            PipelineError::Validation(ValidationError::BelowMinNotional { .. }) => {
                "below_min_notional"
            }
            PipelineError::Internal(_) => "internal",
        }
    }

    /// True when the request itself was at fault (HTTP 400 territory)
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PipelineError::Internal(_))
    }
}
