//! Error types for the Parley library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`ParleyError`] enum. Inference-time "soft" outcomes (no confident match,
//! a predicted tag missing from the live corpus) are deliberately *not*
//! errors — they resolve to the fallback path in the engine — so every
//! variant here represents a genuine failure.
//!
//! # Examples
//!
//! ```
//! use parley::error::{ParleyError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(ParleyError::configuration("domain 'greetings' has no compiled artifacts"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Parley operations.
#[derive(Error, Debug)]
pub enum ParleyError {
    /// I/O errors (corpus files, artifact files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A referenced domain has no compiled artifacts.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A corpus has no intents or no usable pattern phrases.
    #[error("Empty corpus: {0}")]
    EmptyCorpus(String),

    /// Malformed corpus document.
    #[error("Corpus format error: {0}")]
    CorpusFormat(String),

    /// Text analysis errors (tokenization, lemmatization).
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Classifier errors (topology mismatch, untrained model).
    #[error("Model error: {0}")]
    Model(String),

    /// Artifact serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error.
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with ParleyError.
pub type Result<T> = std::result::Result<T, ParleyError>;

impl ParleyError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        ParleyError::Configuration(msg.into())
    }

    /// Create a new empty-corpus error.
    pub fn empty_corpus<S: Into<String>>(msg: S) -> Self {
        ParleyError::EmptyCorpus(msg.into())
    }

    /// Create a new corpus-format error.
    pub fn corpus_format<S: Into<String>>(msg: S) -> Self {
        ParleyError::CorpusFormat(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        ParleyError::Analysis(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        ParleyError::Model(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        ParleyError::Serialization(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ParleyError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = ParleyError::configuration("no artifacts for 'greetings'");
        assert_eq!(
            error.to_string(),
            "Configuration error: no artifacts for 'greetings'"
        );

        let error = ParleyError::empty_corpus("corpus 'general' has no intents");
        assert_eq!(
            error.to_string(),
            "Empty corpus: corpus 'general' has no intents"
        );

        let error = ParleyError::analysis("tokenizer failure");
        assert_eq!(error.to_string(), "Analysis error: tokenizer failure");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let parley_error = ParleyError::from(io_error);

        match parley_error {
            ParleyError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
