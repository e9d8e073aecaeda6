//! Error types for the configuration engine
//!
//! User-facing refusals never surface as these errors: the mutation
//! executor folds them into an `OperationResult`. These types describe
//! failures at the seams (store, document file, settings).

use thiserror::Error;

/// Errors raised by a configuration store while committing a change
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The entity changed since the caller read it
    #[error("Entity fingerprint is stale")]
    StaleFingerprint,

    /// The document would break a structural invariant after the change
    #[error("{0}")]
    StructuralInvalid(String),

    /// Anything else (I/O, poisoned state, backend failures)
    #[error("{0}")]
    Unknown(String),
}

/// Errors reading or writing a configuration document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to access configuration document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Invalid engine settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("{0}")]
    Invalid(String),
}
