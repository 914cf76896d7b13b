//! Online Q-learning players.
//!
//! A [`QLearner`] records a transition every time it is asked for an
//! action, and trains its network on samples from its replay memory at the
//! end of each match. Memory and network sit behind `Rc<RefCell<_>>` so a
//! self-play mirror can feed the same learner from the other side.

mod dense;
mod targets;
mod visual;

pub use dense::*;
pub use targets::*;
pub use visual::*;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use game_core::{Action, MatchState, Side};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::features::reward;
use crate::network::QNetwork;
use crate::{AgentError, ReplayMemory, Transition};

/// How a learner picks actions from its network
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exploration {
    /// Always sample at a fixed temperature
    Temperature(f32),
    /// Random up/down with probability epsilon, otherwise sample at
    /// temperature `0.1 + 2 * epsilon`
    EpsilonGreedy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DqlConfig {
    pub memory_capacity: usize,
    pub training_set_min_size: usize,
    pub training_set_max_size: usize,
    pub training_epochs: usize,
    /// Training rounds after each match
    pub training_iterations: usize,
    pub gamma: f32,
    /// Rate set on the network before training; `None` leaves it alone
    pub learning_rate: Option<f32>,
    pub learning_rate_decay: f32,
    pub epsilon: f32,
    pub epsilon_decay: f32,
    pub exploration: Exploration,
    /// Always take the best estimated action
    pub greedy: bool,
    /// Log target/prediction/error summaries for every training batch
    pub verbose: bool,
    pub seed: u64,
}

impl DqlConfig {
    /// Settings for the hand-picked feature learner
    pub fn dense() -> Self {
        Self {
            memory_capacity: 2000,
            training_set_min_size: 40,
            training_set_max_size: 400,
            training_epochs: 1,
            training_iterations: 4,
            gamma: 1.0,
            learning_rate: None,
            learning_rate_decay: 1.0,
            epsilon: 0.0,
            epsilon_decay: 1.0,
            exploration: Exploration::Temperature(1.0),
            greedy: false,
            verbose: false,
            seed: 0,
        }
    }

    /// Settings for the frame-based learner
    pub fn visual() -> Self {
        Self {
            memory_capacity: 3000,
            training_set_min_size: 20,
            training_set_max_size: 200,
            training_epochs: 1,
            training_iterations: 4,
            gamma: 0.99,
            learning_rate: Some(0.001),
            learning_rate_decay: 0.99,
            epsilon: 0.5,
            epsilon_decay: 0.95,
            exploration: Exploration::EpsilonGreedy,
            greedy: false,
            verbose: false,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), AgentError> {
        if self.memory_capacity == 0 {
            return Err(AgentError::config("memory_capacity", "must be at least 1"));
        }
        if self.training_set_max_size == 0 {
            return Err(AgentError::config("training_set_max_size", "must be at least 1"));
        }
        if self.training_set_min_size > self.training_set_max_size {
            return Err(AgentError::config(
                "training_set_min_size",
                format!(
                    "{} exceeds training_set_max_size {}",
                    self.training_set_min_size, self.training_set_max_size
                ),
            ));
        }
        if self.training_epochs == 0 {
            return Err(AgentError::config("training_epochs", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(AgentError::config(
                "gamma",
                format!("{} is outside [0, 1]", self.gamma),
            ));
        }
        if let Some(lr) = self.learning_rate {
            if !(lr.is_finite() && lr > 0.0) {
                return Err(AgentError::config("learning_rate", format!("{lr} is not positive")));
            }
        }
        for (field, decay) in [
            ("learning_rate_decay", self.learning_rate_decay),
            ("epsilon_decay", self.epsilon_decay),
        ] {
            if !(decay > 0.0 && decay <= 1.0) {
                return Err(AgentError::config(field, format!("{decay} is outside (0, 1]")));
            }
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(AgentError::config(
                "epsilon",
                format!("{} is outside [0, 1]", self.epsilon),
            ));
        }
        if let Exploration::Temperature(t) = self.exploration {
            if !(t.is_finite() && t > 0.0) {
                return Err(AgentError::config("temperature", format!("{t} is not positive")));
            }
        }
        Ok(())
    }
}

/// Q-learning core shared by the dense and visual players
pub struct QLearner<N> {
    side: Side,
    config: DqlConfig,
    memory: Rc<RefCell<ReplayMemory>>,
    network: Rc<RefCell<N>>,
    previous: Option<(Arc<MatchState>, Action)>,
    learning_rate: Option<f32>,
    epsilon: f32,
    rng: StdRng,
}

impl<N: QNetwork> QLearner<N> {
    pub fn new(side: Side, config: DqlConfig, network: N) -> Result<Self, AgentError> {
        config.validate()?;
        let memory = ReplayMemory::new(config.memory_capacity)?;
        Self::with_shared(
            side,
            config,
            Rc::new(RefCell::new(memory)),
            Rc::new(RefCell::new(network)),
        )
    }

    /// Learner feeding an existing memory and network
    pub fn with_shared(
        side: Side,
        config: DqlConfig,
        memory: Rc<RefCell<ReplayMemory>>,
        network: Rc<RefCell<N>>,
    ) -> Result<Self, AgentError> {
        config.validate()?;
        Ok(Self {
            side,
            learning_rate: config.learning_rate,
            epsilon: config.epsilon,
            rng: StdRng::seed_from_u64(config.seed),
            config,
            memory,
            network,
            previous: None,
        })
    }

    /// Record the transition that led to `state`, then pick the next action
    /// from `input`, the encoding of `state`.
    pub fn act(&mut self, state: &Arc<MatchState>, input: &[f32]) -> Result<Action, AgentError> {
        self.observe(state);
        let action = self.choose(input)?;
        self.previous = Some((Arc::clone(state), action));
        Ok(action)
    }

    fn observe(&mut self, state: &Arc<MatchState>) {
        let reward = reward(state, self.side);
        if let Some((previous, action)) = self.previous.take() {
            self.memory.borrow_mut().push(Transition::new(
                self.side,
                previous,
                action,
                Arc::clone(state),
                reward,
            ));
        }
    }

    fn choose(&mut self, input: &[f32]) -> Result<Action, AgentError> {
        let network = self.network.borrow();
        if self.config.greedy {
            return network.greedy_action(input);
        }
        match self.config.exploration {
            Exploration::Temperature(temperature) => {
                network.sample_action(input, temperature, &mut self.rng)
            }
            Exploration::EpsilonGreedy => {
                if self.rng.gen::<f32>() < self.epsilon {
                    Ok(if self.rng.gen_bool(0.5) {
                        Action::Up
                    } else {
                        Action::Down
                    })
                } else {
                    let temperature = 0.1 + 2.0 * self.epsilon;
                    network.sample_action(input, temperature, &mut self.rng)
                }
            }
        }
    }

    /// One training round on a sample of the replay memory.
    ///
    /// Returns `None` without training while the memory holds fewer than
    /// `training_set_min_size` transitions.
    pub fn train<F>(&mut self, encode: &F, baseline: Baseline) -> Result<Option<f32>, AgentError>
    where
        F: Fn(&MatchState, Side) -> Result<Vec<f32>, AgentError>,
    {
        let batch = {
            let memory = self.memory.borrow();
            let size = memory.len().min(self.config.training_set_max_size);
            if size < self.config.training_set_min_size {
                tracing::trace!(side = %self.side, stored = memory.len(), "too few transitions to train");
                return Ok(None);
            }
            memory.sample(size, &mut self.rng)?
        };

        let inputs = batch
            .iter()
            .map(|t| encode(&t.state, t.side))
            .collect::<Result<Vec<_>, _>>()?;
        let next_inputs = batch
            .iter()
            .map(|t| encode(&t.new_state, t.side))
            .collect::<Result<Vec<_>, _>>()?;

        let mut network = self.network.borrow_mut();
        let next = network.predict(&next_inputs)?;
        let (baseline, next) = match baseline {
            Baseline::MeanCentred => (
                mean_centred(&network.predict(&inputs)?),
                mean_centred(&next),
            ),
            Baseline::Masked => (masked_baseline(batch.len()), next),
        };
        let targets = build_targets(&batch, baseline, &next, self.config.gamma);

        if self.config.verbose {
            let predictions = network.predict(&inputs)?;
            let errors = targets
                .iter()
                .zip(&predictions)
                .flat_map(|(t, p)| t.iter().zip(p).map(|(t, p)| (t - p).abs()));
            tracing::debug!(
                side = %self.side,
                targets = %Summary::of(targets.iter().flatten().copied()),
                predictions = %Summary::of(predictions.iter().flatten().copied()),
                errors = %Summary::of(errors),
                "training batch"
            );
        }

        let loss = network.fit(&inputs, &targets, self.config.training_epochs)?;
        tracing::debug!(side = %self.side, batch = batch.len(), loss, "trained");
        Ok(Some(loss))
    }

    /// Drop any transition left pending by a match that ended without
    /// `end_match`, so it can't be completed by the next match's first state.
    pub fn start_match(&mut self) {
        if self.previous.take().is_some() {
            tracing::debug!(side = %self.side, "discarded pending transition");
        }
    }

    /// Forget the running match, train, then decay the learning and
    /// exploration rates.
    pub fn end_match<F>(&mut self, encode: &F, baseline: Baseline) -> Result<(), AgentError>
    where
        F: Fn(&MatchState, Side) -> Result<Vec<f32>, AgentError>,
    {
        self.previous = None;

        if self.config.training_iterations > 0 {
            if let Some(lr) = self.learning_rate {
                self.network.borrow_mut().set_learning_rate(lr);
            }
        }
        for _ in 0..self.config.training_iterations {
            self.train(encode, baseline)?;
        }

        if let Some(lr) = self.learning_rate.as_mut() {
            *lr *= self.config.learning_rate_decay;
        }
        self.epsilon *= self.config.epsilon_decay;
        tracing::debug!(
            side = %self.side,
            learning_rate = ?self.learning_rate,
            epsilon = self.epsilon,
            "decayed"
        );
        Ok(())
    }

    /// Learner for the other side sharing this one's memory and network.
    /// The mirror never trains.
    pub fn mirror(&self) -> Self {
        let config = DqlConfig {
            training_iterations: 0,
            seed: self.config.seed.wrapping_add(1),
            ..self.config.clone()
        };
        Self {
            side: self.side.opposite(),
            learning_rate: config.learning_rate,
            epsilon: config.epsilon,
            rng: StdRng::seed_from_u64(config.seed),
            config,
            memory: Rc::clone(&self.memory),
            network: Rc::clone(&self.network),
            previous: None,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn config(&self) -> &DqlConfig {
        &self.config
    }

    pub fn memory(&self) -> &Rc<RefCell<ReplayMemory>> {
        &self.memory
    }

    pub fn network(&self) -> &Rc<RefCell<N>> {
        &self.network
    }

    pub fn learning_rate(&self) -> Option<f32> {
        self.learning_rate
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Whether a state is waiting for its follow-up
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}
