use std::sync::Arc;

use game_core::{Action, MatchState, Side};

use super::{Baseline, DqlConfig, QLearner};
use crate::features::dense_features;
use crate::network::QNetwork;
use crate::{AgentError, Controller, Mlp, MlpConfig};

/// Q-learning player working on six hand-picked features
pub struct DenseDqlController<N = Mlp> {
    learner: QLearner<N>,
}

impl DenseDqlController<Mlp> {
    /// Player with default settings and a fresh network
    pub fn with_seed(side: Side, seed: u64) -> Result<Self, AgentError> {
        let network = Mlp::new(MlpConfig::dense().with_seed(seed))?;
        Self::new(side, DqlConfig::dense().with_seed(seed), network)
    }
}

impl<N: QNetwork> DenseDqlController<N> {
    pub fn new(side: Side, config: DqlConfig, network: N) -> Result<Self, AgentError> {
        Ok(Self {
            learner: QLearner::new(side, config, network)?,
        })
    }

    pub fn learner(&self) -> &QLearner<N> {
        &self.learner
    }

    /// One training round, outside the end-of-match schedule
    pub fn train(&mut self) -> Result<Option<f32>, AgentError> {
        self.learner.train(&encode, Baseline::MeanCentred)
    }
}

fn encode(state: &MatchState, side: Side) -> Result<Vec<f32>, AgentError> {
    Ok(dense_features(state, side).to_vec())
}

impl<N: QNetwork> Controller for DenseDqlController<N> {
    fn side(&self) -> Side {
        self.learner.side()
    }

    async fn select_action(&mut self, state: &Arc<MatchState>) -> Result<Action, AgentError> {
        let input = dense_features(state, self.learner.side());
        self.learner.act(state, &input)
    }

    async fn on_match_start(&mut self) -> Result<(), AgentError> {
        self.learner.start_match();
        Ok(())
    }

    async fn on_match_end(&mut self, _won: bool) -> Result<(), AgentError> {
        self.learner.end_match(&encode, Baseline::MeanCentred)
    }

    fn mirror_controller(&self) -> Self {
        Self {
            learner: self.learner.mirror(),
        }
    }
}
