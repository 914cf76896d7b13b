use crate::{Body, Params, Side};

/// Axis-aligned overlap test between the ball and the paddle on `side`.
///
/// The paddle is treated as slightly taller than drawn so edge returns
/// count. Rejects on x separation first, then y separation, then when the
/// ball is already behind the paddle.
pub fn paddle_collides(ball: &Body, paddle: &Body, side: Side) -> bool {
    let paddle_half_width = paddle.size.x / 2.0;
    let paddle_half_height = paddle.size.y * Params::COLLISION_HEIGHT_FACTOR / 2.0;
    let ball_half = ball.half_size();

    let ball_left = ball.pos.x - ball_half.x;
    let ball_right = ball.pos.x + ball_half.x;
    let paddle_left = paddle.pos.x - paddle_half_width;
    let paddle_right = paddle.pos.x + paddle_half_width;

    // Too far in front of the paddle
    match side {
        Side::Left if ball_left > paddle_right => return false,
        Side::Right if ball_right < paddle_left => return false,
        _ => {}
    }

    // Above or below the paddle
    if ball.pos.y - ball_half.y > paddle.pos.y + paddle_half_height {
        return false;
    }
    if ball.pos.y + ball_half.y < paddle.pos.y - paddle_half_height {
        return false;
    }

    // Already past the paddle
    match side {
        Side::Left if ball_left < paddle_left => false,
        Side::Right if ball_right > paddle_right => false,
        _ => true,
    }
}

/// Reflect the ball off a paddle, blending in the paddle's vertical motion.
pub fn bounce_off_paddle(ball: &mut Body, paddle: &Body) {
    ball.force.x = -ball.force.x;

    if paddle.force.y != 0.0 {
        let mut force_y = (ball.force.y + paddle.force.y) / 2.0;
        if force_y.abs() < Params::SPIN_MIN_FORCE_Y {
            force_y *= 2.0;
        }
        ball.force = glam::Vec2::new(ball.force.x, force_y).normalize_or_zero();
    }
}
