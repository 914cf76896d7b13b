//! Immutable per-tick snapshots handed to controllers.

use crate::Side;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub x: f32,
    pub y: f32,
    /// Horizontal velocity (direction scaled by current speed)
    pub force_x: f32,
    /// Vertical velocity (direction scaled by current speed)
    pub force_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleState {
    pub x: f32,
    pub y: f32,
}

/// Row-major grayscale grid with intensities in `[0, 1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl Frame {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    /// Cell at `col`, `row`; `None` outside the frame
    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// Left/right mirror image
    pub fn mirrored(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for row in self.data.chunks(self.width.max(1)) {
            data.extend(row.iter().rev());
        }
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Snapshot of a match at one tick. A new one is built every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub ball: BallState,
    pub left_paddle: PaddleState,
    pub right_paddle: PaddleState,
    pub winner: Option<Side>,
    pub frame_index: u32,
    /// Elapsed virtual seconds
    pub time_passed: f32,
    pub frame: Option<Frame>,
    pub previous_frame: Option<Frame>,
}

impl MatchState {
    pub fn paddle(&self, side: Side) -> PaddleState {
        match side {
            Side::Left => self.left_paddle,
            Side::Right => self.right_paddle,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    /// Attach the current and previous visual frames
    pub fn with_frames(mut self, frame: Frame, previous: Option<Frame>) -> Self {
        self.frame = Some(frame);
        self.previous_frame = previous;
        self
    }

    /// Canonical byte encoding, stable across runs
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}
