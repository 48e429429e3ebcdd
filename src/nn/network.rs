//! Network topology, forward evaluation, and the persisted model artifact.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::TrainingConfig;
use crate::error::{ParleyError, Result};

/// Activation applied to a layer's affine output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// Rectified linear unit, used on hidden layers.
    Relu,
    /// Softmax normalization, used on the output layer.
    Softmax,
}

/// A fully connected layer: `output = weights * input + biases`.
///
/// Weights are stored row-major, one row per output unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub(crate) weights: Vec<Vec<f64>>,
    pub(crate) biases: Vec<f64>,
    pub(crate) activation: Activation,
}

impl DenseLayer {
    /// Create a layer with Glorot-uniform initialized weights and zero biases.
    pub fn new<R: Rng + ?Sized>(
        input_len: usize,
        output_len: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        let limit = (6.0 / (input_len + output_len) as f64).sqrt();
        let weights = (0..output_len)
            .map(|_| {
                (0..input_len)
                    .map(|_| rng.random_range(-limit..=limit))
                    .collect()
            })
            .collect();
        DenseLayer {
            weights,
            biases: vec![0.0; output_len],
            activation,
        }
    }

    /// Number of inputs this layer consumes.
    pub fn input_len(&self) -> usize {
        self.weights.first().map(|row| row.len()).unwrap_or(0)
    }

    /// Number of outputs this layer produces.
    pub fn output_len(&self) -> usize {
        self.weights.len()
    }

    /// Affine transform without activation.
    pub(crate) fn affine(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(row, bias)| {
                row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + bias
            })
            .collect()
    }

    /// Apply this layer's activation to an affine output.
    pub(crate) fn activate(&self, z: &[f64]) -> Vec<f64> {
        match self.activation {
            Activation::Relu => z.iter().map(|&v| v.max(0.0)).collect(),
            Activation::Softmax => softmax(z),
        }
    }
}

/// Numerically stable softmax: outputs are positive and sum to 1.
pub(crate) fn softmax(z: &[f64]) -> Vec<f64> {
    let max = z.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = z.iter().map(|&v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|&e| e / sum).collect()
}

/// The feed-forward classifier network.
///
/// Layers run input → hidden (relu) → hidden (relu) → output (softmax).
/// Dropout applies after each hidden layer during training only;
/// [`Network::forward`] is the inference path and treats dropout as
/// pass-through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub(crate) layers: Vec<DenseLayer>,
    pub(crate) dropout: f64,
}

impl Network {
    /// Build a freshly initialized network for the given widths.
    pub fn new<R: Rng + ?Sized>(
        input_len: usize,
        hidden_units_1: usize,
        hidden_units_2: usize,
        output_len: usize,
        dropout: f64,
        rng: &mut R,
    ) -> Self {
        let layers = vec![
            DenseLayer::new(input_len, hidden_units_1, Activation::Relu, rng),
            DenseLayer::new(hidden_units_1, hidden_units_2, Activation::Relu, rng),
            DenseLayer::new(hidden_units_2, output_len, Activation::Softmax, rng),
        ];
        Network { layers, dropout }
    }

    /// Width of the input layer (the vocabulary size it was trained against).
    pub fn input_len(&self) -> usize {
        self.layers.first().map(|l| l.input_len()).unwrap_or(0)
    }

    /// Width of the output layer (the number of topic labels).
    pub fn output_len(&self) -> usize {
        self.layers.last().map(|l| l.output_len()).unwrap_or(0)
    }

    /// Evaluate the network in inference mode.
    ///
    /// Returns the softmax probability distribution over topic labels.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_len() {
            return Err(ParleyError::model(format!(
                "feature vector has {} slots but the network expects {}",
                input.len(),
                self.input_len()
            )));
        }

        let mut current = input.to_vec();
        for layer in &self.layers {
            let z = layer.affine(&current);
            current = layer.activate(&z);
        }
        Ok(current)
    }
}

/// Metadata recorded alongside trained parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// When training finished.
    pub trained_at: chrono::DateTime<chrono::Utc>,
    /// Number of training examples used.
    pub training_examples: usize,
    /// Mean cross-entropy loss after the final epoch.
    pub final_loss: f64,
    /// Hyperparameters the model was trained with.
    pub hyperparameters: HashMap<String, f64>,
}

impl ModelMetadata {
    /// Build metadata from a training run.
    pub fn new(training_examples: usize, final_loss: f64, config: &TrainingConfig) -> Self {
        let mut hyperparameters = HashMap::new();
        hyperparameters.insert("hidden_units_1".to_string(), config.hidden_units_1 as f64);
        hyperparameters.insert("hidden_units_2".to_string(), config.hidden_units_2 as f64);
        hyperparameters.insert("dropout".to_string(), config.dropout);
        hyperparameters.insert("learning_rate".to_string(), config.learning_rate);
        hyperparameters.insert("momentum".to_string(), config.momentum);
        hyperparameters.insert("epochs".to_string(), config.epochs as f64);
        hyperparameters.insert("batch_size".to_string(), config.batch_size as f64);
        ModelMetadata {
            trained_at: chrono::Utc::now(),
            training_examples,
            final_loss,
            hyperparameters,
        }
    }
}

/// The persisted classifier artifact: topology, trained parameters, and
/// training metadata, reloadable without retraining.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierModel {
    /// The trained network.
    pub network: Network,
    /// Provenance of the training run.
    pub metadata: ModelMetadata,
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn test_softmax_handles_large_logits() {
        let probs = softmax(&[1000.0, 1000.0]);
        assert!((probs[0] - 0.5).abs() < 1e-12);
        assert!(probs.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_network_shapes() {
        let mut rng = StdRng::seed_from_u64(1);
        let network = Network::new(10, 256, 128, 4, 0.2, &mut rng);
        assert_eq!(network.input_len(), 10);
        assert_eq!(network.output_len(), 4);

        let output = network.forward(&vec![0.0; 10]).unwrap();
        assert_eq!(output.len(), 4);
        let sum: f64 = output.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_forward_rejects_width_mismatch() {
        let mut rng = StdRng::seed_from_u64(1);
        let network = Network::new(10, 8, 8, 2, 0.2, &mut rng);
        let err = network.forward(&vec![0.0; 7]).unwrap_err();
        assert!(matches!(err, ParleyError::Model(_)));
    }

    #[test]
    fn test_single_class_output_is_certain() {
        let mut rng = StdRng::seed_from_u64(1);
        let network = Network::new(3, 4, 4, 1, 0.2, &mut rng);
        let output = network.forward(&[1.0, 0.0, 1.0]).unwrap();
        assert_eq!(output, vec![1.0]);
    }

    #[test]
    fn test_network_serde_round_trip() {
        let mut rng = StdRng::seed_from_u64(9);
        let network = Network::new(5, 6, 4, 3, 0.2, &mut rng);
        let bytes = bincode::serialize(&network).unwrap();
        let restored: Network = bincode::deserialize(&bytes).unwrap();
        assert_eq!(network, restored);

        let input = vec![1.0, 0.0, 1.0, 0.0, 1.0];
        assert_eq!(
            network.forward(&input).unwrap(),
            restored.forward(&input).unwrap()
        );
    }
}
