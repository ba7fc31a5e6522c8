//! Timeline event definitions
//!
//! Events are the entries of the operator log. They are stamped with the
//! simulation time at which they were appended and are never removed.

use serde::Serialize;

use crate::SimTime;

/// Where an event came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Bootstrap entry written when the console comes up
    Seed,
    /// Synthesized telemetry entry injected while running
    Telemetry,
    /// Operator-triggered marker
    UserMarker,
}

/// One entry of the event log
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineEvent {
    pub time: SimTime,
    pub message: String,
    pub kind: EventKind,
}

impl TimelineEvent {
    pub fn new(time: SimTime, message: impl Into<String>, kind: EventKind) -> Self {
        TimelineEvent {
            time,
            message: message.into(),
            kind,
        }
    }

    pub fn seed(message: impl Into<String>) -> Self {
        Self::new(SimTime::ZERO, message, EventKind::Seed)
    }

    pub fn telemetry(time: SimTime, message: impl Into<String>) -> Self {
        Self::new(time, message, EventKind::Telemetry)
    }

    pub fn user_marker(time: SimTime, label: impl Into<String>) -> Self {
        Self::new(time, label, EventKind::UserMarker)
    }
}

/// Placement of a user marker on the secondary marker strip
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventMarker {
    pub label: String,
    pub time: SimTime,
    /// `time / horizon`, clamped to `[0, 1]`
    pub position: f64,
}

impl EventMarker {
    pub fn new(label: impl Into<String>, time: SimTime, horizon: SimTime) -> Self {
        EventMarker {
            label: label.into(),
            time,
            position: time.fraction_of(horizon),
        }
    }
}
