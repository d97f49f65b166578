//! resultwire Common Library
//!
//! Shared error types and configuration helpers for the result-encoding core.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::TelemetrySettings;
pub use error::{Result, ResultWireError, ValueEncodeError, ValueErrorKind};
