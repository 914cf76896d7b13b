use std::sync::Arc;

use game_core::{Action, MatchState, Side};

use crate::{AgentError, Controller};

/// Never moves
#[derive(Debug, Clone, Copy)]
pub struct IdleController {
    side: Side,
}

impl IdleController {
    pub fn new(side: Side) -> Self {
        Self { side }
    }
}

impl Controller for IdleController {
    fn side(&self) -> Side {
        self.side
    }

    async fn select_action(&mut self, _state: &Arc<MatchState>) -> Result<Action, AgentError> {
        Ok(Action::Stay)
    }

    fn mirror_controller(&self) -> Self {
        Self::new(self.side.opposite())
    }
}
