//! Small fully connected Q-network on candle: ReLU hidden layers, three tanh
//! outputs, inverted dropout while fitting and an Adam optimiser.

use candle_core::{DType, Device, Tensor, Var};
use candle_nn::{AdamW, Linear, Module, Optimizer, ParamsAdamW};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

use crate::features::DENSE_FEATURES;
use crate::network::{QNetwork, QValues, MASK_THRESHOLD};
use crate::AgentError;

const BETA1: f64 = 0.9;
const BETA2: f64 = 0.999;
const ADAM_EPSILON: f64 = 1e-7;

#[derive(Debug, Clone, PartialEq)]
pub struct MlpConfig {
    pub n_inputs: usize,
    pub n_hidden_layers: usize,
    pub n_hidden_units: usize,
    /// Fraction of hidden units dropped on each training pass
    pub dropout: f32,
    pub learning_rate: f32,
    /// Upper bound on the mini-batch size; smaller datasets use one batch
    pub batch_size: usize,
    /// Seeds weight initialisation and batch shuffling
    pub seed: u64,
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self::dense()
    }
}

impl MlpConfig {
    /// Network for the six hand-picked features
    pub fn dense() -> Self {
        Self {
            n_inputs: DENSE_FEATURES,
            n_hidden_layers: 3,
            n_hidden_units: 40,
            dropout: 0.1,
            learning_rate: 0.01,
            batch_size: 80,
            seed: 0,
        }
    }

    /// Network for a flattened frame of `n_inputs` cells
    pub fn visual(n_inputs: usize) -> Self {
        Self {
            n_inputs,
            n_hidden_layers: 1,
            n_hidden_units: 30,
            dropout: 0.1,
            learning_rate: 0.001,
            batch_size: 80,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), AgentError> {
        if self.n_inputs == 0 {
            return Err(AgentError::config("n_inputs", "must be at least 1"));
        }
        if self.n_hidden_layers > 0 && self.n_hidden_units == 0 {
            return Err(AgentError::config("n_hidden_units", "must be at least 1"));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(AgentError::config(
                "dropout",
                format!("{} is outside [0, 1)", self.dropout),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(AgentError::config(
                "learning_rate",
                format!("{} is not positive", self.learning_rate),
            ));
        }
        if self.batch_size == 0 {
            return Err(AgentError::config("batch_size", "must be at least 1"));
        }
        Ok(())
    }
}

/// Huber loss (delta 1) averaged over every entry.
///
/// Entries whose label is below [`MASK_THRESHOLD`] have label and prediction
/// zeroed, so they add nothing to the loss or its gradient.
pub fn masked_huber_loss(predictions: &Tensor, labels: &Tensor) -> candle_core::Result<Tensor> {
    let threshold = Tensor::full(MASK_THRESHOLD, labels.dims(), labels.device())?;
    let keep = labels.ge(&threshold)?;
    let zeros = labels.zeros_like()?;
    let labels = keep.where_cond(labels, &zeros)?;
    let predictions = keep.where_cond(predictions, &zeros)?;

    let error = (predictions - labels)?.abs()?;
    let quadratic = error.minimum(&error.ones_like()?)?;
    let linear = (&error - &quadratic)?;
    ((quadratic.sqr()? * 0.5)? + linear)?.mean_all()
}

/// Multilayer perceptron implementing [`QNetwork`].
///
/// Weights are He-normal draws from the seeded rng, so equal seeds give
/// equal untrained networks. Dropout masks come from candle's own rng.
pub struct Mlp {
    config: MlpConfig,
    device: Device,
    layers: Vec<Linear>,
    vars: Vec<Var>,
    optimizer: AdamW,
    learning_rate: f32,
    rng: StdRng,
}

impl Mlp {
    pub fn new(config: MlpConfig) -> Result<Self, AgentError> {
        config.validate()?;
        let device = Device::Cpu;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let mut layers = Vec::with_capacity(config.n_hidden_layers + 1);
        let mut vars = Vec::with_capacity(2 * (config.n_hidden_layers + 1));
        let mut inputs = config.n_inputs;
        for _ in 0..config.n_hidden_layers {
            layers.push(he_normal(inputs, config.n_hidden_units, &device, &mut rng, &mut vars)?);
            inputs = config.n_hidden_units;
        }
        layers.push(he_normal(inputs, 3, &device, &mut rng, &mut vars)?);

        let optimizer = adam(&vars, config.learning_rate)?;
        Ok(Self {
            learning_rate: config.learning_rate,
            config,
            device,
            layers,
            vars,
            optimizer,
            rng,
        })
    }

    pub fn config(&self) -> &MlpConfig {
        &self.config
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    fn check_input(&self, input: &[f32]) -> Result<(), AgentError> {
        if input.len() != self.config.n_inputs {
            return Err(AgentError::ShapeMismatch {
                expected: self.config.n_inputs,
                actual: input.len(),
            });
        }
        Ok(())
    }

    fn forward(&self, xs: &Tensor, train: bool) -> candle_core::Result<Tensor> {
        let hidden = self.layers.len() - 1;
        let mut activation = xs.clone();
        for layer in &self.layers[..hidden] {
            activation = layer.forward(&activation)?.relu()?;
            if train && self.config.dropout > 0.0 {
                activation = candle_nn::ops::dropout(&activation, self.config.dropout)?;
            }
        }
        self.layers[hidden].forward(&activation)?.tanh()
    }

    fn batch<'a>(&self, rows: impl Iterator<Item = &'a [f32]>, width: usize) -> candle_core::Result<Tensor> {
        let data: Vec<f32> = rows.flatten().copied().collect();
        let count = data.len() / width;
        Tensor::from_vec(data, (count, width), &self.device)
    }

    /// One optimiser step on the samples at `indices`; returns their loss
    fn train_batch(
        &mut self,
        inputs: &[Vec<f32>],
        targets: &[QValues],
        indices: &[usize],
    ) -> candle_core::Result<f32> {
        let xs = self.batch(indices.iter().map(|&i| inputs[i].as_slice()), self.config.n_inputs)?;
        let ys = self.batch(indices.iter().map(|&i| targets[i].as_slice()), 3)?;

        let predictions = self.forward(&xs, true)?;
        let loss = masked_huber_loss(&predictions, &ys)?;
        self.optimizer.backward_step(&loss)?;
        loss.to_scalar::<f32>()
    }
}

/// Dense layer with He-normal weights and zero biases
fn he_normal(
    inputs: usize,
    outputs: usize,
    device: &Device,
    rng: &mut StdRng,
    vars: &mut Vec<Var>,
) -> candle_core::Result<Linear> {
    let std = (2.0 / inputs as f32).sqrt();
    let weights: Vec<f32> = (0..inputs * outputs)
        .map(|_| {
            let z: f32 = StandardNormal.sample(rng);
            z * std
        })
        .collect();
    let weight = Var::from_tensor(&Tensor::from_vec(weights, (outputs, inputs), device)?)?;
    let bias = Var::zeros(outputs, DType::F32, device)?;
    let layer = Linear::new(weight.as_tensor().clone(), Some(bias.as_tensor().clone()));
    vars.push(weight);
    vars.push(bias);
    Ok(layer)
}

/// Adam with fresh moments; AdamW without weight decay
fn adam(vars: &[Var], learning_rate: f32) -> candle_core::Result<AdamW> {
    AdamW::new(
        vars.to_vec(),
        ParamsAdamW {
            lr: learning_rate as f64,
            beta1: BETA1,
            beta2: BETA2,
            eps: ADAM_EPSILON,
            weight_decay: 0.0,
        },
    )
}

impl QNetwork for Mlp {
    fn input_len(&self) -> usize {
        self.config.n_inputs
    }

    fn predict(&self, inputs: &[Vec<f32>]) -> Result<Vec<QValues>, AgentError> {
        for input in inputs {
            self.check_input(input)?;
        }
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        let xs = self.batch(inputs.iter().map(Vec::as_slice), self.config.n_inputs)?;
        let rows = self.forward(&xs, false)?.to_vec2::<f32>()?;
        rows.into_iter()
            .map(|row| match row.as_slice() {
                &[up, stay, down] => Ok([up, stay, down]),
                other => Err(AgentError::ShapeMismatch {
                    expected: 3,
                    actual: other.len(),
                }),
            })
            .collect()
    }

    fn fit(
        &mut self,
        inputs: &[Vec<f32>],
        targets: &[QValues],
        epochs: usize,
    ) -> Result<f32, AgentError> {
        if inputs.len() != targets.len() {
            return Err(AgentError::BatchMismatch {
                inputs: inputs.len(),
                targets: targets.len(),
            });
        }
        for input in inputs {
            self.check_input(input)?;
        }
        if inputs.is_empty() {
            return Ok(0.0);
        }

        let batch_size = self.config.batch_size.min(inputs.len());
        let mut order: Vec<usize> = (0..inputs.len()).collect();
        let mut loss = 0.0;
        for _ in 0..epochs {
            order.shuffle(&mut self.rng);
            let mut total = 0.0;
            for chunk in order.chunks(batch_size) {
                total += self.train_batch(inputs, targets, chunk)? * chunk.len() as f32;
            }
            loss = total / inputs.len() as f32;
        }

        if !loss.is_finite() {
            return Err(AgentError::NonFiniteLoss(loss));
        }
        Ok(loss)
    }

    /// Switch to a fresh optimiser at the new rate
    fn set_learning_rate(&mut self, learning_rate: f32) {
        self.learning_rate = learning_rate;
        match adam(&self.vars, learning_rate) {
            Ok(optimizer) => self.optimizer = optimizer,
            Err(err) => {
                tracing::warn!(error = %err, "could not reset optimiser, keeping its moments");
                self.optimizer.set_learning_rate(learning_rate as f64);
            }
        }
    }
}
