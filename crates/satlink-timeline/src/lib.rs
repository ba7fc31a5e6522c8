//! SATLINK Timeline - Event log and marker strip
//!
//! The store is the only writer of timeline events. Readers query it by
//! simulation time; nothing is ever reordered or removed.

pub mod store;
pub mod telemetry;

pub use store::*;
pub use telemetry::*;
