//! Terminal poses and spot overlays
//!
//! Two terminals (transmit and receive) each carry an azimuth/elevation
//! pair. The feed stores degrees; render targets receive radians.

use std::f64::consts::PI;
use std::fmt;

use satlink_core::SimTime;

use crate::{PoseChannels, SampleFrame, SpotChannels};

/// Terminal identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminal {
    Transmit,
    Receive,
}

impl Terminal {
    pub fn all() -> &'static [Terminal] {
        &[Terminal::Transmit, Terminal::Receive]
    }

    /// Phase offset and direction of the synthetic motion
    fn motion(self) -> (f64, f64) {
        match self {
            Terminal::Transmit => (0.0, 1.0),
            Terminal::Receive => (PI / 3.0, -1.0),
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::Transmit => f.write_str("tx"),
            Terminal::Receive => f.write_str("rx"),
        }
    }
}

/// Antenna pointing, radians
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TerminalPose {
    pub azimuth: f64,
    pub elevation: f64,
}

impl TerminalPose {
    pub fn from_degrees(azimuth: f64, elevation: f64) -> Self {
        TerminalPose {
            azimuth: azimuth.to_radians(),
            elevation: elevation.to_radians(),
        }
    }

    /// Pose from a sample frame; both channels must be present
    pub fn from_frame(frame: &SampleFrame<'_>, channels: &PoseChannels) -> Option<Self> {
        let az = frame.channel(&channels.azimuth)?;
        let el = frame.channel(&channels.elevation)?;
        Some(Self::from_degrees(az, el))
    }

    /// Deterministic motion used when no frame matches, so the scene keeps
    /// moving without data.
    pub fn synthetic(terminal: Terminal, t: SimTime) -> Self {
        let (phase, sign) = terminal.motion();
        let s = t.as_secs_f64();
        TerminalPose {
            azimuth: sign * 0.8 * (0.5 * s + phase).sin(),
            elevation: 0.6 + sign * 0.2 * (0.3 * s + phase).cos(),
        }
    }
}

/// Beam spot offset on the overlay canvas
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpotOffset {
    pub dx: f64,
    pub dy: f64,
}

impl SpotOffset {
    pub fn from_frame(frame: &SampleFrame<'_>, channels: &SpotChannels) -> Option<Self> {
        Some(SpotOffset {
            dx: frame.channel(&channels.dx)?,
            dy: frame.channel(&channels.dy)?,
        })
    }
}
