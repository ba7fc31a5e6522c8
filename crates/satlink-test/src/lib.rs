//! SATLINK Test Harness - Scenario simulation and playback validation
//!
//! This crate provides:
//! - A recording render sink
//! - A scenario runner over a manual wall clock
//! - Predefined operator scenarios
//! - Synthetic sample feeds

pub mod feed;
pub mod recording;
pub mod scenario;

pub use feed::*;
pub use recording::*;
pub use scenario::*;
