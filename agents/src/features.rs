//! Side-relative encodings of a snapshot.
//!
//! Encodings for the right side are mirrored horizontally, so one learner
//! can play (and learn from) both sides.

use game_core::{MatchState, Side};

use crate::AgentError;

pub const DENSE_FEATURES: usize = 6;

/// +1 when `side` has won, -1 when the other side has, 0 while playing
pub fn reward(state: &MatchState, side: Side) -> f32 {
    match state.winner {
        Some(winner) if winner == side => 1.0,
        Some(_) => -1.0,
        None => 0.0,
    }
}

/// `[ballX, ballY, ballVX, ballVY, ownY, otherY]` with positions in `[-1, 1]`
pub fn dense_features(state: &MatchState, side: Side) -> [f32; DENSE_FEATURES] {
    let mut ball_x = state.ball.x * 2.0 - 1.0;
    let ball_y = state.ball.y * 2.0 - 1.0;
    let mut force_x = state.ball.force_x;
    let force_y = state.ball.force_y;
    let own_y = state.paddle(side).y * 2.0 - 1.0;
    let other_y = state.paddle(side.opposite()).y * 2.0 - 1.0;

    if side == Side::Right {
        ball_x = -ball_x;
        force_x = -force_x;
    }

    [ball_x, ball_y, force_x, force_y, own_y, other_y]
}

/// Current frame minus half the previous one, flattened row by row.
///
/// A missing previous frame counts as all zeros.
pub fn visual_input(state: &MatchState, side: Side) -> Result<Vec<f32>, AgentError> {
    let frame = state.frame.as_ref().ok_or(AgentError::MissingFrame)?;
    let mut input = frame.clone();

    if let Some(previous) = &state.previous_frame {
        if previous.len() != frame.len() {
            return Err(AgentError::ShapeMismatch {
                expected: frame.len(),
                actual: previous.len(),
            });
        }
        for (cell, prev) in input.data.iter_mut().zip(&previous.data) {
            *cell -= 0.5 * prev;
        }
    }

    if side == Side::Right {
        input = input.mirrored();
    }
    Ok(input.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{BallState, Frame, PaddleState};

    fn state(winner: Option<Side>) -> MatchState {
        MatchState {
            ball: BallState {
                x: 0.25,
                y: 0.75,
                force_x: 0.6,
                force_y: -0.3,
            },
            left_paddle: PaddleState { x: 0.02, y: 0.5 },
            right_paddle: PaddleState { x: 0.98, y: 1.0 },
            winner,
            frame_index: 3,
            time_passed: 0.12,
            frame: None,
            previous_frame: None,
        }
    }

    #[test]
    fn test_reward() {
        assert_eq!(reward(&state(None), Side::Left), 0.0);
        assert_eq!(reward(&state(Some(Side::Left)), Side::Left), 1.0);
        assert_eq!(reward(&state(Some(Side::Left)), Side::Right), -1.0);
        assert_eq!(reward(&state(Some(Side::Right)), Side::Right), 1.0);
    }

    #[test]
    fn test_dense_features_left() {
        let f = dense_features(&state(None), Side::Left);
        assert_eq!(f, [-0.5, 0.5, 0.6, -0.3, 0.0, 1.0]);
    }

    #[test]
    fn test_dense_features_mirrored_for_right() {
        let f = dense_features(&state(None), Side::Right);
        assert_eq!(f, [0.5, 0.5, -0.6, -0.3, 1.0, 0.0], "x features flip, own paddle first");
    }

    #[test]
    fn test_visual_input_requires_frame() {
        assert_eq!(
            visual_input(&state(None), Side::Left),
            Err(AgentError::MissingFrame)
        );
    }

    #[test]
    fn test_visual_input_subtracts_half_previous() {
        let frame = Frame {
            width: 2,
            height: 1,
            data: vec![1.0, 0.0],
        };
        let previous = Frame {
            width: 2,
            height: 1,
            data: vec![0.0, 1.0],
        };
        let s = state(None).with_frames(frame.clone(), Some(previous));
        assert_eq!(visual_input(&s, Side::Left).unwrap(), vec![1.0, -0.5]);
        assert_eq!(
            visual_input(&s, Side::Right).unwrap(),
            vec![-0.5, 1.0],
            "Right side sees the mirror image"
        );

        let s = state(None).with_frames(frame, None);
        assert_eq!(visual_input(&s, Side::Left).unwrap(), vec![1.0, 0.0]);
    }
}
