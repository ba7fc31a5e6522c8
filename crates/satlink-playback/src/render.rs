//! Render targets
//!
//! The views (3D scene, charts, spot canvas, log, marker strip, readouts)
//! sit behind one trait. Each method may report its target as missing; the
//! driver logs that and carries on.

use std::fmt;

use satlink_core::{EventMarker, SatlinkResult, SimTime, TimelineEvent};
use satlink_time::ClockState;

use crate::{ChartSeries, SpotOffset, Terminal, TerminalPose};

/// Render target identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTarget {
    Scene,
    Chart,
    Spots,
    Log,
    Markers,
    Readout,
}

impl fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderTarget::Scene => "scene",
            RenderTarget::Chart => "chart",
            RenderTarget::Spots => "spots",
            RenderTarget::Log => "log",
            RenderTarget::Markers => "markers",
            RenderTarget::Readout => "readout",
        };
        f.write_str(name)
    }
}

/// Textual time readouts and scrubber position
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    pub display_time: SimTime,
    /// `HH:MM:SS`
    pub timecode: String,
    pub state: ClockState,
    /// Scrubber position in `[0, 1]`
    pub scrubber: f64,
    pub dragging: bool,
}

impl Readout {
    pub fn elapsed_secs(&self) -> f64 {
        self.display_time.as_secs_f64()
    }
}

/// Receives view updates from the driver
pub trait RenderSink {
    fn pose(&mut self, _terminal: Terminal, _pose: TerminalPose) -> SatlinkResult<()> {
        Ok(())
    }

    fn chart(&mut self, _channel: &str, _series: &ChartSeries) -> SatlinkResult<()> {
        Ok(())
    }

    fn spot(&mut self, _terminal: Terminal, _offset: SpotOffset) -> SatlinkResult<()> {
        Ok(())
    }

    /// Full list of visible entries, sent only when the count changed
    fn log(&mut self, _visible: &[&TimelineEvent]) -> SatlinkResult<()> {
        Ok(())
    }

    fn marker(&mut self, _marker: &EventMarker) -> SatlinkResult<()> {
        Ok(())
    }

    fn readout(&mut self, _readout: &Readout) -> SatlinkResult<()> {
        Ok(())
    }
}

/// Headless sink: every target accepts and ignores updates
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {}
