//! Seam between the learners and whatever approximates their Q-values.

use game_core::Action;
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore};

use crate::AgentError;

/// One estimate per action, indexed like [`Action::ALL`]
pub type QValues = [f32; 3];

/// Target entries below this are ignored by the loss
pub const MASK_THRESHOLD: f32 = -5.0;

/// Fill value for target entries that must not contribute to the loss
pub const MASK_VALUE: f32 = -10.0;

/// Function approximator for Q-values.
///
/// `fit` must ignore every target entry below [`MASK_THRESHOLD`].
pub trait QNetwork {
    /// Length of one input vector
    fn input_len(&self) -> usize;

    fn predict(&self, inputs: &[Vec<f32>]) -> Result<Vec<QValues>, AgentError>;

    /// Train on a batch and return the loss of the last epoch
    fn fit(
        &mut self,
        inputs: &[Vec<f32>],
        targets: &[QValues],
        epochs: usize,
    ) -> Result<f32, AgentError>;

    fn set_learning_rate(&mut self, learning_rate: f32);

    fn predict_one(&self, input: &[f32]) -> Result<QValues, AgentError> {
        let mut out = self.predict(&[input.to_vec()])?;
        out.pop().ok_or(AgentError::ShapeMismatch {
            expected: 1,
            actual: 0,
        })
    }

    /// Draw an action from the network's estimates at `temperature`
    fn sample_action(
        &self,
        input: &[f32],
        temperature: f32,
        rng: &mut dyn RngCore,
    ) -> Result<Action, AgentError> {
        let q = self.predict_one(input)?;
        Ok(Action::ALL[sample_with_temperature(&q, temperature, rng)])
    }

    fn greedy_action(&self, input: &[f32]) -> Result<Action, AgentError> {
        let q = self.predict_one(input)?;
        Ok(Action::ALL[argmax(&q)])
    }
}

/// Index of the largest value; the first one wins ties.
pub fn argmax(values: &QValues) -> usize {
    let mut best = 0;
    for (i, value) in values.iter().enumerate() {
        if *value > values[best] {
            best = i;
        }
    }
    best
}

/// Sample an action index from tanh-range estimates.
///
/// Estimates are moved to `[0, 1]`, min-max normalised and passed through
/// `softmax(log(p) / temperature)`. When all estimates are equal every
/// action is equally likely.
pub fn sample_with_temperature<R: Rng + ?Sized>(
    values: &QValues,
    temperature: f32,
    rng: &mut R,
) -> usize {
    let scaled = values.map(|q| (1.0 + q) / 2.0);
    let min = scaled.iter().copied().fold(f32::INFINITY, f32::min);
    let max = scaled.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = max - min;
    if !(range.is_finite() && range > f32::EPSILON && temperature > 0.0) {
        return rng.gen_range(0..values.len());
    }

    // softmax(log(p) / t) with the largest logit shifted to zero
    let weights = scaled.map(|p| {
        let normalized = (p - min) / range;
        (normalized.ln() / temperature).exp()
    });
    match WeightedIndex::new(weights) {
        Ok(dist) => dist.sample(rng),
        Err(_) => rng.gen_range(0..values.len()),
    }
}
