use agents::AgentError;
use game_core::{CaptureError, ConfigError, Side};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunnerError {
    #[error("{side} controller failed: {source}")]
    Controller {
        side: Side,
        #[source]
        source: AgentError,
    },

    #[error("frame capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("invalid engine config: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid runner options: {0}")]
    InvalidOptions(String),

    #[error("match was cancelled before it finished")]
    Cancelled,
}

impl RunnerError {
    pub(crate) fn controller(side: Side) -> impl FnOnce(AgentError) -> Self {
        move |source| RunnerError::Controller { side, source }
    }
}
