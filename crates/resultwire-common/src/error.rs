//! Error types for resultwire
//!
//! Two families live here:
//! - [`ResultWireError`]: fatal failures that are always propagated to the caller
//! - [`ValueEncodeError`]: a contained, cell-level failure that degrades a
//!   produce call to "no data" and is reported through the diagnostic callback

use std::fmt;

/// Result type alias using ResultWireError
pub type Result<T> = std::result::Result<T, ResultWireError>;

/// Fatal error type for the result-encoding core
#[derive(Debug, thiserror::Error)]
pub enum ResultWireError {
    /// Upstream handed us something that breaks a result-set invariant
    /// (rows without columns, a column list that changed shape, a batch
    /// missing a resolved channel)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A declared column type has no encoding strategy
    #[error("Unsupported type for column '{column}': {data_type}")]
    UnsupportedType { column: String, data_type: String },

    /// The buffer or document generator could not be written to
    #[error("JSON generation failed: {0}")]
    Generation(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ResultWireError {
    /// Create an invariant violation from any displayable message
    pub fn invariant<M: fmt::Display>(message: M) -> Self {
        ResultWireError::InvariantViolation(message.to_string())
    }

    /// Get the error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            ResultWireError::InvariantViolation(_) => "INVARIANT_VIOLATION",
            ResultWireError::UnsupportedType { .. } => "UNSUPPORTED_TYPE",
            ResultWireError::Generation(_) => "GENERATION_FAILED",
            ResultWireError::ConfigError(_) => "CONFIG_ERROR",
        }
    }
}

impl From<config::ConfigError> for ResultWireError {
    fn from(err: config::ConfigError) -> Self {
        ResultWireError::ConfigError(err.to_string())
    }
}

/// What went wrong while rendering a single cell
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueErrorKind {
    /// The batch array does not hold the physical type the column declares
    #[error("expected {expected} array, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// The stored value has no calendar/clock representation
    #[error("value {value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    /// Map entries must have non-null keys to become JSON object keys
    #[error("map entry has a null key")]
    NullMapKey,

    /// Two entries of one map render to the same object key
    #[error("map has duplicate key '{key}'")]
    DuplicateMapKey { key: String },
}

impl ValueErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ValueErrorKind::TypeMismatch { .. } => "TYPE_MISMATCH",
            ValueErrorKind::OutOfRange { .. } => "OUT_OF_RANGE",
            ValueErrorKind::NullMapKey => "NULL_MAP_KEY",
            ValueErrorKind::DuplicateMapKey { .. } => "DUPLICATE_MAP_KEY",
        }
    }
}

/// A value-level encode failure with the position of the offending cell
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Could not serialize column '{column_name}' ({data_type}) at batch {batch_index}, row {row_index}: {kind}"
)]
pub struct ValueEncodeError {
    /// Index of the batch within the call's batch sequence
    pub batch_index: usize,
    /// Row index within that batch
    pub row_index: usize,
    /// Output column index (not the source channel)
    pub column_index: usize,
    pub column_name: String,
    /// Declared column type, rendered for diagnostics
    pub data_type: String,
    pub kind: ValueErrorKind,
}
