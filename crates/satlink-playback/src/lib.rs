//! SATLINK Playback - Driver loop for the operator views
//!
//! Every tick runs the same stages:
//! 1. Track the clock into the scrub cursor (unless dragging)
//! 2. Roll for telemetry injection
//! 3. Resolve the sample frame (or synthetic motion) into poses, charts
//!    and spot overlays
//! 4. Push the visible event log
//! 5. Push readouts

pub mod chart;
pub mod config;
pub mod cursor;
pub mod driver;
pub mod loader;
pub mod pose;
pub mod render;
pub mod runner;
pub mod samples;

pub use chart::*;
pub use config::*;
pub use cursor::*;
pub use driver::*;
pub use loader::*;
pub use pose::*;
pub use render::*;
pub use runner::*;
pub use samples::*;
