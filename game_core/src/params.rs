/// Game tuning parameters for Pong.
///
/// All lengths are in normalized court units: the court spans `[0, 1]` on
/// both axes and speeds are court lengths per second.
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Paddle
    pub const PADDLE_X_LEFT: f32 = 0.02;
    pub const PADDLE_X_RIGHT: f32 = 0.98;
    pub const PADDLE_WIDTH: f32 = 0.0375;
    pub const PADDLE_HEIGHT: f32 = 0.25;
    pub const PADDLE_SPEED: f32 = 1.0;

    // Ball
    pub const BALL_WIDTH: f32 = 0.0375;
    pub const BALL_HEIGHT: f32 = 0.05;
    pub const BALL_SPEED: f32 = 0.8;
    pub const BALL_SPEED_INCREASE: f32 = 1.001; // per tick
    pub const BALL_SPEED_MAX: f32 = 2.0;

    // Initial serve direction, before normalization
    pub const SERVE_FORCE_X_MIN: f32 = 0.5;
    pub const SERVE_FORCE_X_SPREAD: f32 = 0.25;
    pub const SERVE_FORCE_Y_MIN: f32 = 0.9;
    pub const SERVE_FORCE_Y_SPREAD: f32 = 0.25;

    // Collision
    pub const COLLISION_HEIGHT_FACTOR: f32 = 1.1; // forgiving paddle edges
    pub const SPIN_MIN_FORCE_Y: f32 = 0.33;

    // Timing
    pub const UPDATE_FREQUENCY_MS: u32 = 40; // 25 Hz
    pub const CONTROLLER_FRAME_INTERVAL: u32 = 5; // poll controllers at 5 Hz
}
