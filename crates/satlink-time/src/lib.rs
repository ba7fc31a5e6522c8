//! SATLINK Time - Simulation clock
//!
//! This crate implements the wall-clock to simulation-time mapping:
//! - Clock state machine (Stopped, Running, Paused)
//! - Pause accounting across resume cycles
//! - Pluggable wall-clock sources (system, manual)

pub mod clock;
pub mod source;

pub use clock::*;
pub use source::*;
