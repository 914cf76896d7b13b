use thiserror::Error;

/// Rejected engine configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("ball_speed_increase must be at least 1.0, got {0}")]
    ShrinkingBall(f32),

    #[error("ball_speed_max ({max}) is below ball_speed ({initial})")]
    MaxBelowInitial { initial: f32, max: f32 },

    #[error("paddle_height must be below 1.0, got {0}")]
    PaddleTooTall(f32),

    #[error("{0} must be non-zero")]
    Zero(&'static str),

    #[error("unknown difficulty level {0}, expected 1..=3")]
    UnknownDifficulty(u8),
}

/// Failure reported by a frame capture collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CaptureError {
    #[error("downscale factor must be non-zero")]
    ZeroDownscale,

    #[error("canvas {width}x{height} is smaller than one {downscale}px cell")]
    EmptyGrid {
        width: u32,
        height: u32,
        downscale: u32,
    },

    #[error("capture failed: {0}")]
    Backend(String),
}
