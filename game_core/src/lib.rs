//! Deterministic Pong match simulation.
//!
//! Court coordinates are normalized to `[0, 1]` on both axes. The ball and
//! paddles live in a `hecs` world; [`MatchEngine`] drives the systems in a
//! fixed order each tick and exposes immutable [`MatchState`] snapshots.

pub mod capture;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod params;
pub mod resources;
pub mod state;
pub mod systems;

pub use capture::*;
pub use components::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use params::*;
pub use resources::*;
pub use state::*;

use glam::Vec2;
use hecs::World;

/// Helper to create a paddle entity, vertically clamped to the court
pub fn create_paddle(world: &mut World, config: &Config, side: Side, y: f32) -> hecs::Entity {
    let body = Body::new(
        Vec2::new(config.paddle_x(side), config.clamp_paddle_y(y)),
        Vec2::new(config.paddle_width, config.paddle_height),
        config.paddle_speed,
    );
    world.spawn((body, Paddle::new(side), PaddleIntent::new()))
}

/// Helper to create the ball entity, initially at rest
pub fn create_ball(world: &mut World, pos: Vec2, speed: f32) -> hecs::Entity {
    let body = Body::new(pos, Vec2::new(Params::BALL_WIDTH, Params::BALL_HEIGHT), speed);
    world.spawn((body, Ball))
}
