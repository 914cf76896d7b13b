pub mod collision;
pub mod movement;
pub mod winner;

pub use collision::*;
pub use movement::*;
pub use winner::*;
