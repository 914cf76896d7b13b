use thiserror::Error;

/// Failure inside a controller, its replay memory or its network.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AgentError {
    #[error("invalid {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("cannot sample {requested} transitions, only {stored} stored")]
    SampleOutOfRange { requested: usize, stored: usize },

    #[error("state snapshot carries no frame")]
    MissingFrame,

    #[error("expected input of length {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("batch has {inputs} inputs but {targets} targets")]
    BatchMismatch { inputs: usize, targets: usize },

    #[error("training loss is not finite ({0})")]
    NonFiniteLoss(f32),

    #[error("tensor backend failed: {0}")]
    Backend(String),
}

impl From<candle_core::Error> for AgentError {
    fn from(err: candle_core::Error) -> Self {
        AgentError::Backend(err.to_string())
    }
}

impl AgentError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        AgentError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
