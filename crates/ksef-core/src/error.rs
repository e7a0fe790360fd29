//! Error types for the ksef-core library.

use thiserror::Error;

/// Main error type for the ksef library.
#[derive(Error, Debug)]
pub enum KsefError {
    /// The document is not well-formed XML (or not UTF-8).
    ///
    /// Recoverable: the batch runner records it and moves on to the next file.
    #[error("malformed document {source_name}: {message}")]
    MalformedDocument {
        /// File or upload name the document came from.
        source_name: String,
        /// Parser diagnostic.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Section name not recognised.
    #[error("unknown section: {0} (expected one of seller, buyer, header, lines)")]
    UnknownSection(String),
}

impl KsefError {
    /// Build a [`KsefError::MalformedDocument`] from any parser diagnostic.
    pub fn malformed(source_name: impl Into<String>, message: impl ToString) -> Self {
        Self::MalformedDocument {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    /// Whether the batch runner may skip past this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedDocument { .. })
    }
}

impl From<serde_json::Error> for KsefError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Result type for the ksef library.
pub type Result<T> = std::result::Result<T, KsefError>;
