use crate::{Body, Side};

/// Decide whether the ball has left the court past a paddle.
///
/// Exiting past the left paddle while moving left means the right side
/// wins, and vice versa.
pub fn compute_winner(ball: &Body, left: &Body, right: &Body) -> Option<Side> {
    let ball_half_width = ball.size.x / 2.0;

    if ball.force.x < 0.0 && ball.pos.x - ball_half_width < left.pos.x - left.size.x / 2.0 {
        return Some(Side::Right);
    }
    if ball.force.x > 0.0 && ball.pos.x + ball_half_width > right.pos.x + right.size.x / 2.0 {
        return Some(Side::Left);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Params};
    use glam::Vec2;

    fn bodies(ball_x: f32, force_x: f32) -> (Body, Body, Body) {
        let config = Config::new();
        let size = Vec2::new(config.paddle_width, config.paddle_height);
        let left = Body::new(Vec2::new(config.paddle_x(Side::Left), 0.5), size, 1.0);
        let right = Body::new(Vec2::new(config.paddle_x(Side::Right), 0.5), size, 1.0);
        let mut ball = Body::new(
            Vec2::new(ball_x, 0.5),
            Vec2::new(Params::BALL_WIDTH, Params::BALL_HEIGHT),
            0.8,
        );
        ball.force.x = force_x;
        (ball, left, right)
    }

    #[test]
    fn test_right_wins_when_ball_exits_left() {
        let (ball, left, right) = bodies(-0.01, -1.0);
        assert_eq!(compute_winner(&ball, &left, &right), Some(Side::Right));
    }

    #[test]
    fn test_left_wins_when_ball_exits_right() {
        let (ball, left, right) = bodies(1.01, 1.0);
        assert_eq!(compute_winner(&ball, &left, &right), Some(Side::Left));
    }

    #[test]
    fn test_no_winner_when_ball_in_bounds() {
        let (ball, left, right) = bodies(0.5, 1.0);
        assert_eq!(compute_winner(&ball, &left, &right), None);
    }

    #[test]
    fn test_no_winner_when_ball_heading_back_in() {
        let (ball, left, right) = bodies(-0.01, 1.0);
        assert_eq!(
            compute_winner(&ball, &left, &right),
            None,
            "Direction matters, not only position"
        );
    }
}
