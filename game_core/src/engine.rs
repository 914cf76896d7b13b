use glam::Vec2;
use hecs::World;
use rand::Rng;

use crate::systems::*;
use crate::{
    create_ball, create_paddle, Action, BallState, Body, Config, ConfigError, Events, GameRng,
    MatchState, PaddleState, Params, Side, Time,
};

/// Deterministic fixed-step Pong simulator for a single match.
///
/// Given the same seed and the same action sequence, two engines produce
/// identical snapshot sequences.
pub struct MatchEngine {
    world: World,
    config: Config,
    time: Time,
    events: Events,
    frame_index: u32,
    winner: Option<Side>,
}

impl MatchEngine {
    /// Start a match with the ball served from the centre in a random direction
    pub fn new(config: Config, seed: u64) -> Result<Self, ConfigError> {
        let mut rng = GameRng::new(seed);
        let force = serve_direction(&mut rng);
        Self::new_with_state(config, Vec2::splat(0.5), force, 0.5, 0.5)
    }

    /// Start a match from an exact placement of ball and paddles
    pub fn new_with_state(
        config: Config,
        ball_pos: Vec2,
        ball_force: Vec2,
        left_y: f32,
        right_y: f32,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = World::new();
        create_paddle(&mut world, &config, Side::Left, left_y);
        create_paddle(&mut world, &config, Side::Right, right_y);
        let ball = create_ball(&mut world, ball_pos, config.ball_speed);
        if let Ok(mut body) = world.get::<&mut Body>(ball) {
            body.force = ball_force;
        }

        let time = Time::new(config.time_factor(), 0.0);
        let mut engine = Self {
            world,
            config,
            time,
            events: Events::new(),
            frame_index: 0,
            winner: None,
        };
        engine.update_winner();
        Ok(engine)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn time(&self) -> Time {
        self.time
    }

    /// Events raised by the most recent tick
    pub fn events(&self) -> &Events {
        &self.events
    }

    pub fn ball(&self) -> Body {
        ball_body(&self.world).unwrap_or_default()
    }

    pub fn paddle(&self, side: Side) -> Body {
        paddle_body(&self.world, side).unwrap_or_default()
    }

    /// Winner of the match. Once set it never changes.
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Whether the ball currently overlaps the paddle on `side`
    pub fn check_collision(&self, side: Side) -> bool {
        paddle_collides(&self.ball(), &self.paddle(side), side)
    }

    /// Run one physics step of `dt` virtual seconds
    pub fn advance(&mut self, left: Action, right: Action, dt: f32) {
        self.time.dt = dt;
        self.events.clear();

        // 1. Paddle intents become vertical force
        set_intent(&mut self.world, Side::Left, left);
        set_intent(&mut self.world, Side::Right, right);
        apply_intents(&mut self.world, &self.config);

        // 2. Move paddles, then the ball (bouncing off paddles and walls)
        move_paddle(&mut self.world, Side::Left, &self.time, &self.config, &mut self.events);
        move_paddle(&mut self.world, Side::Right, &self.time, &self.config, &mut self.events);
        move_ball(&mut self.world, &self.time, &mut self.events);

        // 3. Ball speeds up every tick
        ramp_ball_speed(&mut self.world, &self.config);

        // 4. Check for a winner
        self.update_winner();

        self.frame_index += 1;
        self.time.now += dt;

        if self.events.ball_hit_paddle {
            tracing::trace!(frame = self.frame_index, "ball hit paddle");
        }
    }

    /// Advance by the configured fixed step and return the new snapshot
    pub fn tick(&mut self, left: Action, right: Action) -> MatchState {
        self.advance(left, right, self.config.time_factor());
        self.snapshot()
    }

    /// Immutable view of the current state
    pub fn snapshot(&self) -> MatchState {
        let ball = self.ball();
        let velocity = ball.velocity();
        let left = self.paddle(Side::Left);
        let right = self.paddle(Side::Right);

        MatchState {
            ball: BallState {
                x: ball.pos.x,
                y: ball.pos.y,
                force_x: velocity.x,
                force_y: velocity.y,
            },
            left_paddle: PaddleState {
                x: left.pos.x,
                y: left.pos.y,
            },
            right_paddle: PaddleState {
                x: right.pos.x,
                y: right.pos.y,
            },
            winner: self.winner,
            frame_index: self.frame_index,
            time_passed: self.frame_index as f32 * self.config.time_factor(),
            frame: None,
            previous_frame: None,
        }
    }

    fn update_winner(&mut self) {
        if self.winner.is_some() {
            return;
        }
        let winner = compute_winner(
            &self.ball(),
            &self.paddle(Side::Left),
            &self.paddle(Side::Right),
        );
        if let Some(side) = winner {
            tracing::debug!(winner = %side, frame = self.frame_index, "ball left the court");
            self.winner = Some(side);
        }
    }
}

/// Random unit serve direction, biased toward horizontal travel
fn serve_direction(rng: &mut GameRng) -> Vec2 {
    let force_x = Params::SERVE_FORCE_X_MIN + rng.0.gen::<f32>() * Params::SERVE_FORCE_X_SPREAD;
    let force_y = Params::SERVE_FORCE_Y_MIN + rng.0.gen::<f32>() * Params::SERVE_FORCE_Y_SPREAD;
    let norm = (force_x * force_x + force_y * force_y).sqrt();
    let sign_x = if rng.0.gen_bool(0.5) { 1.0 } else { -1.0 };
    let sign_y = if rng.0.gen_bool(0.5) { 1.0 } else { -1.0 };
    Vec2::new(sign_x * force_x / norm, sign_y * force_y / norm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let engine = MatchEngine::new(Config::new(), 42).unwrap();
        let state = engine.snapshot();

        assert_eq!((state.ball.x, state.ball.y), (0.5, 0.5));
        assert_eq!(state.left_paddle, PaddleState { x: 0.02, y: 0.5 });
        assert_eq!(state.right_paddle, PaddleState { x: 0.98, y: 0.5 });
        assert_eq!(state.winner, None);
        assert_eq!(state.frame_index, 0);
    }

    #[test]
    fn test_serve_direction_is_unit_and_bounded() {
        for seed in 0..50 {
            let engine = MatchEngine::new(Config::new(), seed).unwrap();
            let force = engine.ball().force;
            assert!((force.length() - 1.0).abs() < 1e-5, "seed {seed}: not unit");
            // |x| / |y| lies in [0.5 / 1.15, 0.75 / 0.9]
            let ratio = force.x.abs() / force.y.abs();
            assert!(ratio >= 0.5 / 1.15 - 1e-4 && ratio <= 0.75 / 0.9 + 1e-4);
        }
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = Config {
            ball_speed: -1.0,
            ..Config::new()
        };
        assert!(MatchEngine::new(config, 1).is_err());
    }

    #[test]
    fn test_snapshot_force_is_velocity() {
        let engine =
            MatchEngine::new_with_state(Config::new(), Vec2::splat(0.5), Vec2::new(1.0, 0.0), 0.5, 0.5)
                .unwrap();
        let state = engine.snapshot();
        assert_eq!(state.ball.force_x, Config::new().ball_speed);
        assert_eq!(state.ball.force_y, 0.0);
    }

    #[test]
    fn test_tick_advances_time() {
        let mut engine = MatchEngine::new(Config::new(), 3).unwrap();
        let state = engine.tick(Action::Stay, Action::Stay);
        assert_eq!(state.frame_index, 1);
        assert!((state.time_passed - 0.04).abs() < 1e-6);
        let state = engine.tick(Action::Stay, Action::Stay);
        assert!((state.time_passed - 0.08).abs() < 1e-6);
    }

    #[test]
    fn test_ball_speeds_up_each_tick() {
        let mut engine = MatchEngine::new(Config::new(), 3).unwrap();
        let before = engine.ball().speed;
        engine.tick(Action::Stay, Action::Stay);
        let after = engine.ball().speed;
        assert!((after - before * 1.001).abs() < 1e-6);
    }

    #[test]
    fn test_paddle_returns_ball() {
        // Ball heading straight at the left paddle
        let mut engine = MatchEngine::new_with_state(
            Config::new(),
            Vec2::new(0.2, 0.5),
            Vec2::new(-1.0, 0.0),
            0.5,
            0.5,
        )
        .unwrap();

        let mut bounced = false;
        for _ in 0..20 {
            engine.tick(Action::Stay, Action::Stay);
            bounced |= engine.events().ball_hit_paddle;
        }
        assert!(bounced, "Ball should hit the left paddle");
        assert!(engine.ball().force.x > 0.0);
        assert_eq!(engine.winner(), None);
    }

    #[test]
    fn test_missed_ball_gives_winner() {
        // Ball heading at the left wall, paddle out of the way
        let mut engine = MatchEngine::new_with_state(
            Config::new(),
            Vec2::new(0.2, 0.5),
            Vec2::new(-1.0, 0.0),
            0.15,
            0.5,
        )
        .unwrap();

        for _ in 0..20 {
            engine.tick(Action::Stay, Action::Stay);
        }
        assert_eq!(engine.winner(), Some(Side::Right));
        assert_eq!(engine.snapshot().winner, Some(Side::Right));
    }

    #[test]
    fn test_winner_is_sticky() {
        let mut engine = MatchEngine::new_with_state(
            Config::new(),
            Vec2::new(0.005, 0.5),
            Vec2::new(-1.0, 0.0),
            0.15,
            0.5,
        )
        .unwrap();
        assert_eq!(engine.winner(), Some(Side::Right));

        // Push the ball back into the court; the result must not change
        let ball = engine
            .world
            .query::<&crate::Ball>()
            .iter()
            .next()
            .map(|(e, _)| e)
            .unwrap();
        {
            let mut body = engine.world.get::<&mut Body>(ball).unwrap();
            body.pos = Vec2::splat(0.5);
            body.force = Vec2::new(1.0, 0.0);
        }
        for _ in 0..60 {
            engine.tick(Action::Stay, Action::Stay);
        }
        assert_eq!(engine.winner(), Some(Side::Right));
    }

    #[test]
    fn test_check_collision_reports_overlap() {
        let engine = MatchEngine::new_with_state(
            Config::new(),
            Vec2::new(0.05, 0.5),
            Vec2::new(-1.0, 0.0),
            0.5,
            0.5,
        )
        .unwrap();
        assert!(engine.check_collision(Side::Left));
        assert!(!engine.check_collision(Side::Right));
    }
}
