//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// One or more notes could not be extracted
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// The submission endpoint rejected a record or was unreachable
    #[error("Submission failed: {0}")]
    Submission(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<dme_extractor::ExtractorError> for CliError {
    fn from(e: dme_extractor::ExtractorError) -> Self {
        match e {
            dme_extractor::ExtractorError::Config(msg) => CliError::Config(msg),
            other => CliError::Extraction(other.to_string()),
        }
    }
}
