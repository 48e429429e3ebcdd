//! Pipeline configuration.
//!
//! Both the corpus compiler and the inference engine take an explicit,
//! immutable [`PipelineConfig`] instead of reading ambient state (current
//! working directory, global lemmatizer, process-wide RNG). Construct one
//! configuration up front and share it between the two subsystems so that
//! compilation and inference agree on normalization rules and thresholds.
//!
//! # Examples
//!
//! ```
//! use parley::config::PipelineConfig;
//!
//! let config = PipelineConfig::default();
//! assert_eq!(config.confidence_threshold, 0.1);
//! assert_eq!(config.training.epochs, 200);
//!
//! let config = PipelineConfig::new("corpora", "models").with_seed(42);
//! assert_eq!(config.seed, Some(42));
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Punctuation tokens excluded from every vocabulary.
const DEFAULT_IGNORE_TOKENS: &[&str] = &[
    "?", "!", ".", ",", "'", "\"", "/", "£", "$", "%", "^", "&", "*", "@", ":", ";", "#", "~",
    "|", "<", ">", "{", "}", "_", "-", "+", "=",
];

/// Responses used when no topic scores above the confidence threshold.
const DEFAULT_FALLBACK_RESPONSES: &[&str] = &[
    "Sorry, I don't understand that.",
    "Could you rephrase that?",
    "I'm not sure what you mean.",
];

/// Configuration shared by the corpus compiler and the inference engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory containing corpus JSON files (one per domain).
    pub corpora_dir: PathBuf,
    /// Directory where compiled artifacts are written.
    pub models_dir: PathBuf,
    /// Minimum probability a topic must exceed to be retained at inference.
    pub confidence_threshold: f64,
    /// Tokens excluded from the vocabulary (the punctuation-ignore set).
    pub ignore_tokens: Vec<String>,
    /// Responses drawn from when no topic clears the threshold.
    pub fallback_responses: Vec<String>,
    /// Classifier training hyperparameters.
    pub training: TrainingConfig,
    /// Seed for shuffling, weight initialization, and response selection.
    /// `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            corpora_dir: PathBuf::from("corpora"),
            models_dir: PathBuf::from("models"),
            confidence_threshold: 0.1,
            ignore_tokens: DEFAULT_IGNORE_TOKENS.iter().map(|s| s.to_string()).collect(),
            fallback_responses: DEFAULT_FALLBACK_RESPONSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            training: TrainingConfig::default(),
            seed: None,
        }
    }
}

impl PipelineConfig {
    /// Create a configuration with the given corpora and models directories.
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(corpora_dir: P, models_dir: Q) -> Self {
        PipelineConfig {
            corpora_dir: corpora_dir.into(),
            models_dir: models_dir.into(),
            ..Default::default()
        }
    }

    /// Set the RNG seed for reproducible compilation and response selection.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the confidence threshold.
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }
}

/// Hyperparameters for classifier training.
///
/// The defaults reproduce the fixed topology the pipeline was designed
/// around: two rectified-linear hidden layers (256 and 128 units) with 0.2
/// dropout after each, a softmax output, and Nesterov-accelerated SGD run
/// for 200 passes in mini-batches of 5.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Width of the first hidden layer.
    pub hidden_units_1: usize,
    /// Width of the second hidden layer.
    pub hidden_units_2: usize,
    /// Dropout rate applied after each hidden layer during training.
    pub dropout: f64,
    /// SGD learning rate.
    pub learning_rate: f64,
    /// SGD momentum coefficient (Nesterov-accelerated).
    pub momentum: f64,
    /// Number of full passes over the training set.
    pub epochs: usize,
    /// Mini-batch size.
    pub batch_size: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            hidden_units_1: 256,
            hidden_units_2: 128,
            dropout: 0.2,
            learning_rate: 0.01,
            momentum: 0.5,
            epochs: 200,
            batch_size: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.confidence_threshold, 0.1);
        assert!(config.ignore_tokens.contains(&"?".to_string()));
        assert!(!config.fallback_responses.is_empty());
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_training_defaults() {
        let training = TrainingConfig::default();
        assert_eq!(training.hidden_units_1, 256);
        assert_eq!(training.hidden_units_2, 128);
        assert_eq!(training.dropout, 0.2);
        assert_eq!(training.learning_rate, 0.01);
        assert_eq!(training.momentum, 0.5);
        assert_eq!(training.epochs, 200);
        assert_eq!(training.batch_size, 5);
    }

    #[test]
    fn test_builder_helpers() {
        let config = PipelineConfig::new("c", "m")
            .with_seed(7)
            .with_confidence_threshold(0.25);
        assert_eq!(config.corpora_dir, PathBuf::from("c"));
        assert_eq!(config.models_dir, PathBuf::from("m"));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.confidence_threshold, 0.25);
    }
}
