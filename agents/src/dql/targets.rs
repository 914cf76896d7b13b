//! Bootstrapped Q-learning targets.

use std::fmt;

use crate::network::{QValues, MASK_VALUE};
use crate::Transition;

/// What untouched target entries are filled with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    /// The network's own estimates for the prior state, minus their mean
    MeanCentred,
    /// The mask sentinel, so only the taken action is trained
    Masked,
}

/// Subtract the mean over every entry of the batch
pub fn mean_centred(values: &[QValues]) -> Vec<QValues> {
    if values.is_empty() {
        return Vec::new();
    }
    let count = (values.len() * 3) as f32;
    let mean = values.iter().flatten().sum::<f32>() / count;
    values.iter().map(|q| q.map(|v| v - mean)).collect()
}

pub fn masked_baseline(len: usize) -> Vec<QValues> {
    vec![[MASK_VALUE; 3]; len]
}

/// Training targets for a batch.
///
/// Each target starts as its baseline row; only the entry of the action
/// taken is replaced, with `reward + gamma * max(next)` clamped to
/// `[-1, 1]`. A terminal `new_state` contributes no future value.
pub fn build_targets(
    transitions: &[Transition],
    baseline: Vec<QValues>,
    next: &[QValues],
    gamma: f32,
) -> Vec<QValues> {
    transitions
        .iter()
        .zip(baseline)
        .zip(next)
        .map(|((transition, mut target), next)| {
            let future = if transition.new_state.winner.is_some() {
                0.0
            } else {
                next.iter().copied().fold(f32::NEG_INFINITY, f32::max)
            };
            target[transition.action.index()] =
                (transition.reward + gamma * future).clamp(-1.0, 1.0);
            target
        })
        .collect()
}

/// min/max/mean/std of a set of values, for training diagnostics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub std: f32,
}

impl Summary {
    pub fn of(values: impl IntoIterator<Item = f32>) -> Self {
        let values: Vec<f32> = values.into_iter().collect();
        if values.is_empty() {
            return Self {
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                std: 0.0,
            };
        }
        let n = values.len() as f32;
        let mean = values.iter().sum::<f32>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
        Self {
            min: values.iter().copied().fold(f32::INFINITY, f32::min),
            max: values.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            mean,
            std: variance.sqrt(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min={:.3} max={:.3} mean={:.3} std={:.3}",
            self.min, self.max, self.mean, self.std
        )
    }
}
