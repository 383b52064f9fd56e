//! Error types for ghscan-snyk
//!
//! Startup errors (configuration, credentials, store connection) abort the
//! run. Everything that happens per repository or per file is isolated and
//! ends up either in the run summary or as a failed import record.

use thiserror::Error;

/// Importer error type
#[derive(Debug, Error)]
pub enum ImporterError {
    /// Required credential missing or blank
    #[error("Missing required credential: {0}")]
    MissingCredential(&'static str),

    /// Invalid setting value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Repository inventory could not be loaded
    #[error("Inventory error: {0}")]
    Inventory(String),

    /// The result writer task panicked or was aborted
    #[error("Result writer failed: {0}")]
    Writer(String),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// ghscan-common error
    #[error(transparent)]
    Common(#[from] ghscan_common::Error),
}

/// Result type for importer operations
pub type ImporterResult<T> = Result<T, ImporterError>;
