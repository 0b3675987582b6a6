//! Error types for the kontera-core library.
//!
//! Business conditions that are expected during normal processing (a field
//! that is not on the invoice, a name that is not in the registry) are never
//! errors. They are represented as absent fields or as [`MatchStatus`]
//! variants and surface only through the quality report.
//!
//! [`MatchStatus`]: crate::models::matching::MatchStatus

use thiserror::Error;

/// Main error type for the kontera library.
#[derive(Error, Debug)]
pub enum KonteraError {
    /// The cost-bearer registry could not be obtained or read.
    #[error("registry error: {0}")]
    Registry(String),

    /// Document text could not be acquired at all.
    #[error("text acquisition error: {0}")]
    Text(String),

    /// Invalid configuration. Fails fast at startup, never per document.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the kontera library.
pub type Result<T> = std::result::Result<T, KonteraError>;
