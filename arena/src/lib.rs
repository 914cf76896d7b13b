//! Runs Pong matches between controllers.
//!
//! [`MatchRunner`] drives one match on a tokio current-thread runtime;
//! [`Session`] plays matches back to back and keeps [`MatchStats`].

pub mod error;
pub mod runner;
pub mod session;
pub mod stats;

pub use error::*;
pub use runner::*;
pub use session::*;
pub use stats::*;
