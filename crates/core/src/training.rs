//! Synthetic "training" used to produce a plausible loss figure.
//!
//! A tiny linear model takes one gradient step per call on a fresh batch of
//! uniform random inputs and targets. The loss has no meaning beyond looking
//! like a loss. The accuracy figure reported next to it is illustrative: it
//! depends only on how many steps remain and never on the loss.

use rand::Rng;

/// Optimization steps per job, independent of the job's nominal duration.
pub const TRAINING_STEPS: u32 = 10;

const FEATURES: usize = 8;
const BATCH: usize = 16;
const LEARNING_RATE: f64 = 0.05;

/// Accuracy (percent) shown when no steps remain.
const ACCURACY_CEILING: f64 = 95.0;
/// How far below the ceiling the first step starts.
const ACCURACY_SPAN: f64 = 40.0;

/// Single-layer linear regressor trained with plain SGD on MSE.
#[derive(Debug, Clone)]
pub struct SyntheticModel {
    weights: [f64; FEATURES],
    bias: f64,
}

impl SyntheticModel {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut weights = [0.0; FEATURES];
        for w in &mut weights {
            *w = rng.random_range(-0.5..0.5);
        }
        Self { weights, bias: 0.0 }
    }

    /// One forward pass, MSE loss, backward pass, and SGD update.
    ///
    /// Returns the loss measured before the update.
    pub fn train_step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        let mut grad_w = [0.0; FEATURES];
        let mut grad_b = 0.0;
        let mut loss = 0.0;

        for _ in 0..BATCH {
            let mut x = [0.0; FEATURES];
            for v in &mut x {
                *v = rng.random_range(-1.0..1.0);
            }
            let target: f64 = rng.random_range(-1.0..1.0);

            let prediction = self.forward(&x);
            let err = prediction - target;
            loss += err * err;

            for (g, xi) in grad_w.iter_mut().zip(x.iter()) {
                *g += 2.0 * err * xi;
            }
            grad_b += 2.0 * err;
        }

        let n = BATCH as f64;
        for (w, g) in self.weights.iter_mut().zip(grad_w.iter()) {
            *w -= LEARNING_RATE * g / n;
        }
        self.bias -= LEARNING_RATE * grad_b / n;

        loss / n
    }

    fn forward(&self, x: &[f64; FEATURES]) -> f64 {
        self.weights
            .iter()
            .zip(x.iter())
            .map(|(w, xi)| w * xi)
            .sum::<f64>()
            + self.bias
    }
}

/// Illustrative accuracy (percent) for a step, rising as `remaining` falls.
pub fn illustrative_accuracy(remaining: u32, total: u32) -> f64 {
    if total == 0 {
        return ACCURACY_CEILING;
    }
    let remaining = remaining.min(total);
    ACCURACY_CEILING - ACCURACY_SPAN * f64::from(remaining) / f64::from(total)
}
