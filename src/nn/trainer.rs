//! Optimization loop: Nesterov-accelerated SGD on categorical cross-entropy.
//!
//! The trainer mutates a [`Network`] in place. It does not shuffle the
//! training set — the compiler shuffles once, before fitting, so the order
//! seen here is already randomized and stays fixed across epochs.

use std::time::Instant;

use rand::Rng;

use crate::config::TrainingConfig;
use crate::error::{ParleyError, Result};
use crate::nn::TrainingExample;
use crate::nn::network::{Activation, Network};

/// Statistics from a completed training run.
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Number of epochs run.
    pub epochs: usize,
    /// Mean cross-entropy loss per epoch.
    pub epoch_losses: Vec<f64>,
    /// Mean loss of the final epoch.
    pub final_loss: f64,
    /// Wall-clock training time in milliseconds.
    pub training_time_ms: u64,
}

/// Per-layer gradient accumulator, shaped like the layer it belongs to.
struct LayerGradients {
    weights: Vec<Vec<f64>>,
    biases: Vec<f64>,
}

impl LayerGradients {
    fn zeros_like(network: &Network) -> Vec<LayerGradients> {
        network
            .layers
            .iter()
            .map(|layer| LayerGradients {
                weights: vec![vec![0.0; layer.input_len()]; layer.output_len()],
                biases: vec![0.0; layer.output_len()],
            })
            .collect()
    }

    fn reset(grads: &mut [LayerGradients]) {
        for grad in grads.iter_mut() {
            for row in &mut grad.weights {
                row.fill(0.0);
            }
            grad.biases.fill(0.0);
        }
    }
}

/// Activations and dropout masks captured during one training-mode forward
/// pass, kept for backpropagation.
struct ForwardCache {
    /// Input seen by each layer (the previous layer's post-dropout output).
    inputs: Vec<Vec<f64>>,
    /// Pre-activation affine outputs per layer.
    zs: Vec<Vec<f64>>,
    /// Inverted-dropout scale per hidden layer output; `None` on the output
    /// layer, where dropout never applies.
    masks: Vec<Option<Vec<f64>>>,
    /// Softmax output of the final layer.
    output: Vec<f64>,
}

/// Fits a network to a training set with the configured hyperparameters.
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    /// Create a trainer with the given hyperparameters.
    pub fn new(config: TrainingConfig) -> Self {
        Trainer { config }
    }

    /// Train `network` on `examples`, mutating its parameters in place.
    ///
    /// The example order is preserved; shuffle before calling. Returns the
    /// loss curve and timing of the run.
    pub fn fit<R: Rng + ?Sized>(
        &self,
        network: &mut Network,
        examples: &[TrainingExample],
        rng: &mut R,
    ) -> Result<TrainingStats> {
        if examples.is_empty() {
            return Err(ParleyError::model("cannot train on an empty training set"));
        }
        for example in examples {
            if example.features.len() != network.input_len() {
                return Err(ParleyError::model(format!(
                    "training example has {} features but the network expects {}",
                    example.features.len(),
                    network.input_len()
                )));
            }
            if example.label.len() != network.output_len() {
                return Err(ParleyError::model(format!(
                    "training label has {} slots but the network expects {}",
                    example.label.len(),
                    network.output_len()
                )));
            }
        }

        let start = Instant::now();
        let mut velocities = LayerGradients::zeros_like(network);
        let mut gradients = LayerGradients::zeros_like(network);
        let mut epoch_losses = Vec::with_capacity(self.config.epochs);

        for epoch in 0..self.config.epochs {
            let mut epoch_loss = 0.0;

            for batch in examples.chunks(self.config.batch_size) {
                LayerGradients::reset(&mut gradients);

                for example in batch {
                    let cache = self.forward_train(network, &example.features, rng);
                    epoch_loss += cross_entropy(&cache.output, &example.label);
                    self.backward(network, &cache, &example.label, &mut gradients);
                }

                self.apply_nesterov_update(network, &gradients, &mut velocities, batch.len());
            }

            let mean_loss = epoch_loss / examples.len() as f64;
            epoch_losses.push(mean_loss);
            if (epoch + 1) % 50 == 0 {
                log::debug!(
                    "epoch {}/{}: mean loss {:.6}",
                    epoch + 1,
                    self.config.epochs,
                    mean_loss
                );
            }
        }

        let final_loss = epoch_losses.last().copied().unwrap_or(0.0);
        Ok(TrainingStats {
            epochs: self.config.epochs,
            epoch_losses,
            final_loss,
            training_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Forward pass in training mode: dropout is live on hidden layers.
    fn forward_train<R: Rng + ?Sized>(
        &self,
        network: &Network,
        input: &[f64],
        rng: &mut R,
    ) -> ForwardCache {
        let keep_prob = 1.0 - network.dropout;
        let mut inputs = Vec::with_capacity(network.layers.len());
        let mut zs = Vec::with_capacity(network.layers.len());
        let mut masks = Vec::with_capacity(network.layers.len());
        let mut current = input.to_vec();

        for layer in &network.layers {
            inputs.push(current.clone());
            let z = layer.affine(&current);
            let mut activated = layer.activate(&z);
            zs.push(z);

            if layer.activation == Activation::Relu && keep_prob < 1.0 {
                // Inverted dropout: surviving units are scaled up so the
                // expected activation matches inference mode.
                let mask: Vec<f64> = activated
                    .iter()
                    .map(|_| {
                        if rng.random::<f64>() < keep_prob {
                            1.0 / keep_prob
                        } else {
                            0.0
                        }
                    })
                    .collect();
                for (a, m) in activated.iter_mut().zip(&mask) {
                    *a *= m;
                }
                masks.push(Some(mask));
            } else {
                masks.push(None);
            }

            current = activated;
        }

        ForwardCache {
            inputs,
            zs,
            masks,
            output: current,
        }
    }

    /// Backpropagate one example's gradients into the accumulator.
    ///
    /// Softmax combined with cross-entropy gives the output delta
    /// `prediction - target` directly.
    fn backward(
        &self,
        network: &Network,
        cache: &ForwardCache,
        target: &[f64],
        gradients: &mut [LayerGradients],
    ) {
        let mut delta: Vec<f64> = cache
            .output
            .iter()
            .zip(target)
            .map(|(y, t)| y - t)
            .collect();

        for i in (0..network.layers.len()).rev() {
            let layer = &network.layers[i];
            let layer_input = &cache.inputs[i];

            for (r, d) in delta.iter().enumerate() {
                let grad_row = &mut gradients[i].weights[r];
                for (c, x) in layer_input.iter().enumerate() {
                    grad_row[c] += d * x;
                }
                gradients[i].biases[r] += d;
            }

            if i == 0 {
                break;
            }

            // Propagate through this layer's weights, then back through the
            // previous layer's dropout mask and relu derivative.
            let prev_len = layer.input_len();
            let mut prev_delta = vec![0.0; prev_len];
            for (r, d) in delta.iter().enumerate() {
                for (c, w) in layer.weights[r].iter().enumerate() {
                    prev_delta[c] += w * d;
                }
            }
            if let Some(mask) = &cache.masks[i - 1] {
                for (d, m) in prev_delta.iter_mut().zip(mask) {
                    *d *= m;
                }
            }
            for (d, z) in prev_delta.iter_mut().zip(&cache.zs[i - 1]) {
                if *z <= 0.0 {
                    *d = 0.0;
                }
            }
            delta = prev_delta;
        }
    }

    /// Nesterov-accelerated momentum update, averaged over the batch.
    fn apply_nesterov_update(
        &self,
        network: &mut Network,
        gradients: &[LayerGradients],
        velocities: &mut [LayerGradients],
        batch_len: usize,
    ) {
        let lr = self.config.learning_rate;
        let momentum = self.config.momentum;
        let scale = 1.0 / batch_len as f64;

        for ((layer, grad), velocity) in network
            .layers
            .iter_mut()
            .zip(gradients)
            .zip(velocities.iter_mut())
        {
            for (r, row) in layer.weights.iter_mut().enumerate() {
                for (c, w) in row.iter_mut().enumerate() {
                    let g = grad.weights[r][c] * scale;
                    let v = momentum * velocity.weights[r][c] - lr * g;
                    velocity.weights[r][c] = v;
                    *w += momentum * v - lr * g;
                }
            }
            for (r, b) in layer.biases.iter_mut().enumerate() {
                let g = grad.biases[r] * scale;
                let v = momentum * velocity.biases[r] - lr * g;
                velocity.biases[r] = v;
                *b += momentum * v - lr * g;
            }
        }
    }
}

/// Categorical cross-entropy of one prediction against a one-hot target.
fn cross_entropy(prediction: &[f64], target: &[f64]) -> f64 {
    -prediction
        .iter()
        .zip(target)
        .map(|(y, t)| t * (y + 1e-12).ln())
        .sum::<f64>()
}
