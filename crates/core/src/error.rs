//! Unified error types for the metrics engine.
//!
//! Error codes:
//! - STORE_001: Input relations cannot be read
//! - SCHEMA_001: Required column absent or of the wrong type
//! - PARAM_001: Negative or out-of-range parameter
//! - VALID_001: Row failed field validation
//! - CONFIG_001: Configuration could not be loaded

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the metrics engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The backing store could not be read.
    #[error("[STORE_001] {backend} unavailable: {message}")]
    StorageUnavailable {
        backend: &'static str,
        message: String,
    },

    /// A required column is missing or has an incompatible type.
    #[error("[SCHEMA_001] {table}.{column}: {reason}")]
    SchemaMismatch {
        table: String,
        column: String,
        reason: String,
    },

    /// A window, threshold or offset is out of range.
    #[error("[PARAM_001] invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("[VALID_001] validation error: {0}")]
    Validation(String),

    #[error("[CONFIG_001] config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a storage error.
    pub fn storage(backend: &'static str, msg: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            backend,
            message: msg.into(),
        }
    }

    /// Create a schema mismatch error.
    pub fn schema(
        table: impl Into<String>,
        column: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::SchemaMismatch {
            table: table.into(),
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::StorageUnavailable { .. } => "STORE_001",
            Self::SchemaMismatch { .. } => "SCHEMA_001",
            Self::InvalidParameter { .. } => "PARAM_001",
            Self::Validation(_) => "VALID_001",
            Self::Config(_) => "CONFIG_001",
        }
    }

    /// Whether the run must abort on this error.
    ///
    /// Validation failures are absorbed during snapshot cleaning; everything
    /// else stops the computation.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Validation(_))
    }
}
