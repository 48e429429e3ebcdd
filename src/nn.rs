//! Feed-forward classifier: topology, training, and serialization.
//!
//! The classifier is a small dense network with a fixed shape — input width
//! equal to the vocabulary size, two rectified-linear hidden layers with
//! dropout regularization between them, and a softmax output over the topic
//! labels — trained with Nesterov-accelerated SGD on categorical
//! cross-entropy. [`network::Network`] holds the parameters and runs
//! inference; [`trainer::Trainer`] owns the optimization loop.

pub mod network;
pub mod trainer;

use serde::{Deserialize, Serialize};

/// A supervised training pair: bag-of-words features and a one-hot label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// Binary feature vector, one slot per vocabulary entry.
    pub features: Vec<f64>,
    /// One-hot label vector, one slot per topic label.
    pub label: Vec<f64>,
}

impl TrainingExample {
    /// Create a new training example.
    pub fn new(features: Vec<f64>, label: Vec<f64>) -> Self {
        TrainingExample { features, label }
    }
}
