use std::sync::Arc;

use game_core::{Action, MatchState, Side};

use super::{Baseline, DqlConfig, QLearner};
use crate::features::visual_input;
use crate::network::QNetwork;
use crate::{AgentError, Controller, Mlp, MlpConfig};

/// Q-learning player that sees only downscaled frames of the court
pub struct VisualDqlController<N = Mlp> {
    learner: QLearner<N>,
}

impl VisualDqlController<Mlp> {
    /// Player with default settings for frames of `width` x `height` cells
    pub fn with_seed(side: Side, width: usize, height: usize, seed: u64) -> Result<Self, AgentError> {
        let network = Mlp::new(MlpConfig::visual(width * height).with_seed(seed))?;
        Self::new(side, DqlConfig::visual().with_seed(seed), network)
    }
}

impl<N: QNetwork> VisualDqlController<N> {
    pub fn new(side: Side, config: DqlConfig, network: N) -> Result<Self, AgentError> {
        Ok(Self {
            learner: QLearner::new(side, config, network)?,
        })
    }

    pub fn learner(&self) -> &QLearner<N> {
        &self.learner
    }

    pub fn train(&mut self) -> Result<Option<f32>, AgentError> {
        self.learner.train(&visual_input, Baseline::Masked)
    }
}

impl<N: QNetwork> Controller for VisualDqlController<N> {
    fn side(&self) -> Side {
        self.learner.side()
    }

    fn needs_frames(&self) -> bool {
        true
    }

    async fn select_action(&mut self, state: &Arc<MatchState>) -> Result<Action, AgentError> {
        let input = visual_input(state, self.learner.side())?;
        self.learner.act(state, &input)
    }

    async fn on_match_start(&mut self) -> Result<(), AgentError> {
        self.learner.start_match();
        Ok(())
    }

    async fn on_match_end(&mut self, _won: bool) -> Result<(), AgentError> {
        self.learner.end_match(&visual_input, Baseline::Masked)
    }

    fn mirror_controller(&self) -> Self {
        Self {
            learner: self.learner.mirror(),
        }
    }
}
