//! SATLINK Core - Fundamental types and primitives
//!
//! This crate defines the core types shared by the console crates:
//! - Simulation time (SimTime) and timecode formatting
//! - Timeline events and event markers
//! - Error types

pub mod time;
pub mod event;
pub mod error;

pub use time::*;
pub use event::*;
pub use error::*;
