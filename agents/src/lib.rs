//! Pong players.
//!
//! Every player implements [`Controller`]. Besides the idle, scripted and
//! keyboard players there are two Q-learning players that learn online from
//! the matches they play: [`DenseDqlController`] works on a handful of
//! hand-picked features, [`VisualDqlController`] on downscaled frames.

pub mod controller;
pub mod dql;
pub mod error;
pub mod features;
pub mod idle;
pub mod keyboard;
pub mod mlp;
pub mod network;
pub mod replay;
pub mod scripted;

pub use controller::*;
pub use dql::*;
pub use error::*;
pub use idle::*;
pub use keyboard::*;
pub use mlp::*;
pub use network::*;
pub use replay::*;
pub use scripted::*;
