use std::sync::Arc;

use game_core::{Action, MatchState, Side};

use crate::{
    AgentError, DenseDqlController, IdleController, KeyController, ScriptedController,
    VisualDqlController,
};

/// A player for one side of a match.
///
/// The runner calls `on_match_start` once, then `select_action` with the
/// latest snapshot every few ticks (and once more on the tick a winner
/// appears), then `on_match_end`.
#[allow(async_fn_in_trait)]
pub trait Controller {
    fn side(&self) -> Side;

    /// Whether snapshots handed to this controller must carry frames
    fn needs_frames(&self) -> bool {
        false
    }

    async fn select_action(&mut self, state: &Arc<MatchState>) -> Result<Action, AgentError>;

    async fn on_match_start(&mut self) -> Result<(), AgentError> {
        Ok(())
    }

    async fn on_match_end(&mut self, won: bool) -> Result<(), AgentError> {
        let _ = won;
        Ok(())
    }

    /// A controller of the same kind for the opposite side.
    ///
    /// Learners share their replay memory and network with the mirror; the
    /// mirror never trains.
    fn mirror_controller(&self) -> Self
    where
        Self: Sized;
}

/// Any built-in controller, chosen at runtime
pub enum PlayerController {
    Idle(IdleController),
    Scripted(ScriptedController),
    Key(KeyController),
    Dense(DenseDqlController),
    Visual(VisualDqlController),
}

impl PlayerController {
    pub fn kind(&self) -> &'static str {
        match self {
            PlayerController::Idle(_) => "idle",
            PlayerController::Scripted(_) => "scripted",
            PlayerController::Key(_) => "key",
            PlayerController::Dense(_) => "dense",
            PlayerController::Visual(_) => "visual",
        }
    }
}

impl Controller for PlayerController {
    fn side(&self) -> Side {
        match self {
            PlayerController::Idle(c) => c.side(),
            PlayerController::Scripted(c) => c.side(),
            PlayerController::Key(c) => c.side(),
            PlayerController::Dense(c) => c.side(),
            PlayerController::Visual(c) => c.side(),
        }
    }

    fn needs_frames(&self) -> bool {
        match self {
            PlayerController::Idle(c) => c.needs_frames(),
            PlayerController::Scripted(c) => c.needs_frames(),
            PlayerController::Key(c) => c.needs_frames(),
            PlayerController::Dense(c) => c.needs_frames(),
            PlayerController::Visual(c) => c.needs_frames(),
        }
    }

    async fn select_action(&mut self, state: &Arc<MatchState>) -> Result<Action, AgentError> {
        match self {
            PlayerController::Idle(c) => c.select_action(state).await,
            PlayerController::Scripted(c) => c.select_action(state).await,
            PlayerController::Key(c) => c.select_action(state).await,
            PlayerController::Dense(c) => c.select_action(state).await,
            PlayerController::Visual(c) => c.select_action(state).await,
        }
    }

    async fn on_match_start(&mut self) -> Result<(), AgentError> {
        match self {
            PlayerController::Idle(c) => c.on_match_start().await,
            PlayerController::Scripted(c) => c.on_match_start().await,
            PlayerController::Key(c) => c.on_match_start().await,
            PlayerController::Dense(c) => c.on_match_start().await,
            PlayerController::Visual(c) => c.on_match_start().await,
        }
    }

    async fn on_match_end(&mut self, won: bool) -> Result<(), AgentError> {
        match self {
            PlayerController::Idle(c) => c.on_match_end(won).await,
            PlayerController::Scripted(c) => c.on_match_end(won).await,
            PlayerController::Key(c) => c.on_match_end(won).await,
            PlayerController::Dense(c) => c.on_match_end(won).await,
            PlayerController::Visual(c) => c.on_match_end(won).await,
        }
    }

    fn mirror_controller(&self) -> Self {
        match self {
            PlayerController::Idle(c) => PlayerController::Idle(c.mirror_controller()),
            PlayerController::Scripted(c) => PlayerController::Scripted(c.mirror_controller()),
            PlayerController::Key(c) => PlayerController::Key(c.mirror_controller()),
            PlayerController::Dense(c) => PlayerController::Dense(c.mirror_controller()),
            PlayerController::Visual(c) => PlayerController::Visual(c.mirror_controller()),
        }
    }
}

impl From<IdleController> for PlayerController {
    fn from(c: IdleController) -> Self {
        PlayerController::Idle(c)
    }
}

impl From<ScriptedController> for PlayerController {
    fn from(c: ScriptedController) -> Self {
        PlayerController::Scripted(c)
    }
}

impl From<KeyController> for PlayerController {
    fn from(c: KeyController) -> Self {
        PlayerController::Key(c)
    }
}

impl From<DenseDqlController> for PlayerController {
    fn from(c: DenseDqlController) -> Self {
        PlayerController::Dense(c)
    }
}

impl From<VisualDqlController> for PlayerController {
    fn from(c: VisualDqlController) -> Self {
        PlayerController::Visual(c)
    }
}
