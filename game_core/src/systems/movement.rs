use crate::{Ball, Body, Config, Events, Paddle, PaddleIntent, Side, Time};
use hecs::World;

use super::{bounce_off_paddle, paddle_collides};

/// Copy out the body of the paddle on `side`
pub fn paddle_body(world: &World, side: Side) -> Option<Body> {
    world
        .query::<(&Body, &Paddle)>()
        .iter()
        .find(|(_e, (_body, paddle))| paddle.side == side)
        .map(|(_e, (body, _paddle))| *body)
}

/// Copy out the ball's body
pub fn ball_body(world: &World) -> Option<Body> {
    world
        .query::<(&Body, &Ball)>()
        .iter()
        .next()
        .map(|(_e, (body, _ball))| *body)
}

/// Record the requested action on each paddle's intent
pub fn set_intent(world: &mut World, side: Side, action: crate::Action) {
    for (_entity, (paddle, intent)) in world.query_mut::<(&Paddle, &mut PaddleIntent)>() {
        if paddle.side == side {
            intent.action = action;
        }
    }
}

/// Turn paddle intents into vertical force
pub fn apply_intents(world: &mut World, config: &Config) {
    for (_entity, (body, intent)) in world.query_mut::<(&mut Body, &PaddleIntent)>() {
        body.force.y = intent.action.direction();
        body.speed = config.paddle_speed;
    }
}

/// Move the paddle on `side`. Paddles stop dead at the walls.
pub fn move_paddle(world: &mut World, side: Side, time: &Time, config: &Config, events: &mut Events) {
    for (_entity, (body, paddle)) in world.query_mut::<(&mut Body, &Paddle)>() {
        if paddle.side != side {
            continue;
        }

        if body.force.x != 0.0 {
            body.pos.x += body.force.x * body.speed * time.dt;
        }

        if body.force.y != 0.0 {
            let y = body.pos.y + body.force.y * body.speed * time.dt;
            let clamped = config.clamp_paddle_y(y);
            if clamped != y {
                body.force.y = 0.0;
                events.paddle_hit_wall = true;
            }
            body.pos.y = clamped;
        }
    }
}

/// Move the ball, bouncing it off paddles and walls
pub fn move_ball(world: &mut World, time: &Time, events: &mut Events) {
    // Read paddle data first so the ball can be borrowed mutably
    let left = paddle_body(world, Side::Left);
    let right = paddle_body(world, Side::Right);

    for (_entity, (body, _ball)) in world.query_mut::<(&mut Body, &Ball)>() {
        if body.force.x != 0.0 {
            body.pos.x += body.force.x * body.speed * time.dt;

            let (side, paddle) = if body.force.x > 0.0 {
                (Side::Right, right)
            } else {
                (Side::Left, left)
            };
            if let Some(paddle) = paddle {
                if paddle_collides(body, &paddle, side) {
                    bounce_off_paddle(body, &paddle);
                    events.ball_hit_paddle = true;
                }
            }
        }

        if body.force.y != 0.0 {
            body.pos.y += body.force.y * body.speed * time.dt;

            // Only reflect while heading outward so a deep overshoot can't
            // flip the ball back and forth on consecutive ticks
            let half_height = body.size.y / 2.0;
            let above = body.pos.y < half_height && body.force.y < 0.0;
            let below = body.pos.y > 1.0 - half_height && body.force.y > 0.0;
            if above || below {
                body.force.y = -body.force.y;
                events.ball_hit_wall = true;
            }
        }
    }
}

/// Multiply the ball's speed by the per-tick growth factor, capped
pub fn ramp_ball_speed(world: &mut World, config: &Config) {
    for (_entity, (body, _ball)) in world.query_mut::<(&mut Body, &Ball)>() {
        body.speed = (body.speed * config.ball_speed_increase).min(config.ball_speed_max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_ball, create_paddle, Action, Params};
    use glam::Vec2;

    fn setup_world() -> (World, Config, Events, Time) {
        let mut world = World::new();
        let config = Config::new();
        create_paddle(&mut world, &config, Side::Left, 0.5);
        create_paddle(&mut world, &config, Side::Right, 0.5);
        (world, config, Events::new(), Time::new(0.04, 0.0))
    }

    #[test]
    fn test_paddle_moves_with_intent() {
        let (mut world, config, mut events, time) = setup_world();
        set_intent(&mut world, Side::Left, Action::Down);
        apply_intents(&mut world, &config);
        move_paddle(&mut world, Side::Left, &time, &config, &mut events);

        let left = paddle_body(&world, Side::Left).unwrap();
        assert!((left.pos.y - 0.54).abs() < 1e-6, "Paddle should move down");
        let right = paddle_body(&world, Side::Right).unwrap();
        assert_eq!(right.pos.y, 0.5, "Other paddle untouched");
    }

    #[test]
    fn test_paddle_stops_at_wall() {
        let (mut world, config, mut events, time) = setup_world();
        set_intent(&mut world, Side::Right, Action::Up);
        for _ in 0..100 {
            apply_intents(&mut world, &config);
            move_paddle(&mut world, Side::Right, &time, &config, &mut events);
        }

        let right = paddle_body(&world, Side::Right).unwrap();
        assert_eq!(right.pos.y, config.paddle_height / 2.0);
        assert_eq!(right.force.y, 0.0, "Paddle velocity zeroed at the wall");
        assert!(events.paddle_hit_wall);
    }

    #[test]
    fn test_ball_bounces_off_top_wall() {
        let (mut world, _config, mut events, time) = setup_world();
        let ball = create_ball(&mut world, Vec2::new(0.5, Params::BALL_HEIGHT / 2.0), 0.8);
        world.get::<&mut Body>(ball).unwrap().force = Vec2::new(0.6, -0.8);

        move_ball(&mut world, &time, &mut events);

        let body = ball_body(&world).unwrap();
        assert!(body.force.y > 0.0, "Ball should bounce down after hitting top wall");
        assert_eq!(body.force.x, 0.6, "X force should be unchanged");
        assert!(events.ball_hit_wall);
    }

    #[test]
    fn test_ball_bounces_off_bottom_wall() {
        let (mut world, _config, mut events, time) = setup_world();
        let ball = create_ball(&mut world, Vec2::new(0.5, 1.0 - Params::BALL_HEIGHT / 2.0), 0.8);
        world.get::<&mut Body>(ball).unwrap().force = Vec2::new(0.6, 0.8);

        move_ball(&mut world, &time, &mut events);

        let body = ball_body(&world).unwrap();
        assert!(body.force.y < 0.0, "Ball should bounce up after hitting bottom wall");
        assert!(events.ball_hit_wall);
    }

    #[test]
    fn test_ball_bounces_off_left_paddle() {
        let (mut world, _config, mut events, time) = setup_world();
        let ball = create_ball(&mut world, Vec2::new(0.07, 0.5), 0.8);
        world.get::<&mut Body>(ball).unwrap().force = Vec2::new(-1.0, 0.0);

        move_ball(&mut world, &time, &mut events);

        let body = ball_body(&world).unwrap();
        assert!(body.force.x > 0.0, "Ball should bounce right after hitting left paddle");
        assert!(events.ball_hit_paddle);
    }

    #[test]
    fn test_ball_ignores_paddle_when_moving_away() {
        let (mut world, _config, mut events, time) = setup_world();
        let ball = create_ball(&mut world, Vec2::new(0.06, 0.5), 0.8);
        world.get::<&mut Body>(ball).unwrap().force = Vec2::new(1.0, 0.0);

        move_ball(&mut world, &time, &mut events);

        let body = ball_body(&world).unwrap();
        assert_eq!(body.force.x, 1.0, "Ball should not bounce when moving away");
        assert!(!events.ball_hit_paddle);
    }

    #[test]
    fn test_ball_speed_caps_at_max() {
        let (mut world, config, _events, _time) = setup_world();
        create_ball(&mut world, Vec2::new(0.5, 0.5), config.ball_speed_max - 0.0001);

        for _ in 0..10 {
            ramp_ball_speed(&mut world, &config);
        }

        let body = ball_body(&world).unwrap();
        assert_eq!(body.speed, config.ball_speed_max);
    }
}
