use std::sync::Arc;

use game_core::{Action, MatchState, Side};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{AgentError, Controller};

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedConfig {
    /// Calls between decisions
    pub reaction_time: u32,
    /// Chance of moving the wrong way after a decision
    pub hiccup_chance: f64,
    pub seed: u64,
}

impl Default for ScriptedConfig {
    fn default() -> Self {
        Self {
            reaction_time: 4,
            hiccup_chance: 0.05,
            seed: 0,
        }
    }
}

impl ScriptedConfig {
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.reaction_time == 0 {
            return Err(AgentError::config("reaction_time", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.hiccup_chance) {
            return Err(AgentError::config(
                "hiccup_chance",
                format!("{} is outside [0, 1]", self.hiccup_chance),
            ));
        }
        Ok(())
    }
}

/// Follows the ball vertically, slowly and with the occasional mistake
#[derive(Debug, Clone)]
pub struct ScriptedController {
    side: Side,
    config: ScriptedConfig,
    current: Action,
    calls: u32,
    rng: StdRng,
}

impl ScriptedController {
    pub fn new(side: Side, config: ScriptedConfig) -> Result<Self, AgentError> {
        config.validate()?;
        Ok(Self {
            side,
            rng: StdRng::seed_from_u64(config.seed),
            config,
            current: Action::Stay,
            calls: 0,
        })
    }

    pub fn config(&self) -> &ScriptedConfig {
        &self.config
    }
}

impl Controller for ScriptedController {
    fn side(&self) -> Side {
        self.side
    }

    async fn select_action(&mut self, state: &Arc<MatchState>) -> Result<Action, AgentError> {
        self.calls = self.calls.wrapping_add(1);
        if self.calls % self.config.reaction_time != 0 {
            return Ok(self.current);
        }

        let paddle = state.paddle(self.side);
        self.current = if paddle.y > state.ball.y {
            Action::Up
        } else {
            Action::Down
        };
        if self.rng.gen_bool(self.config.hiccup_chance) {
            self.current = if self.current == Action::Up {
                Action::Down
            } else {
                Action::Up
            };
        }
        Ok(self.current)
    }

    fn mirror_controller(&self) -> Self {
        let config = ScriptedConfig {
            seed: self.config.seed.wrapping_add(1),
            ..self.config.clone()
        };
        Self {
            side: self.side.opposite(),
            rng: StdRng::seed_from_u64(config.seed),
            config,
            current: Action::Stay,
            calls: 0,
        }
    }
}
