use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Court side owned by a paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paddle command: -1 = up, 0 = stop, 1 = down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    #[default]
    Stay,
    Down,
}

/// Error for integers outside {-1, 0, 1}
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid action {0}, expected -1, 0 or 1")]
pub struct InvalidAction(pub i32);

impl Action {
    /// Ordered action set; a Q-value vector is indexed by this order.
    pub const ALL: [Action; 3] = [Action::Up, Action::Stay, Action::Down];

    pub fn value(self) -> i8 {
        match self {
            Action::Up => -1,
            Action::Stay => 0,
            Action::Down => 1,
        }
    }

    pub fn index(self) -> usize {
        (self.value() + 1) as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn direction(self) -> f32 {
        self.value() as f32
    }
}

impl TryFrom<i32> for Action {
    type Error = InvalidAction;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Action::Up),
            0 => Ok(Action::Stay),
            1 => Ok(Action::Down),
            other => Err(InvalidAction(other)),
        }
    }
}

/// Physical state of a movable object (ball or paddle).
///
/// `force` is the direction of travel, `speed` scales it into a velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
    pub force: Vec2,
    pub speed: f32,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            pos,
            size,
            force: Vec2::ZERO,
            speed,
        }
    }

    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn velocity(&self) -> Vec2 {
        self.force * self.speed
    }
}

/// Paddle component - marks a body as a player's paddle
#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    pub side: Side,
}

impl Paddle {
    pub fn new(side: Side) -> Self {
        Self { side }
    }
}

/// Ball component
#[derive(Debug, Clone, Copy, Default)]
pub struct Ball;

/// Movement intent for paddle
#[derive(Debug, Clone, Copy, Default)]
pub struct PaddleIntent {
    pub action: Action,
}

impl PaddleIntent {
    pub fn new() -> Self {
        Self::default()
    }
}
