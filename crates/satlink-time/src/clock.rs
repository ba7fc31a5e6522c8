//! Simulation clock
//!
//! Maps wall-clock time onto simulation time for the current run.
//! INVARIANT: simulation time is never negative and restarts at zero after
//! every stop.

use std::fmt;
use std::time::{Duration, Instant};

use satlink_core::SimTime;

use crate::{SystemTimeSource, TimeSource};

/// Externally visible clock state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ClockState {
    #[default]
    Stopped,
    Running,
    Paused,
}

impl ClockState {
    pub fn is_running(self) -> bool {
        self == ClockState::Running
    }
}

impl fmt::Display for ClockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ClockState::Stopped => "stopped",
            ClockState::Running => "running",
            ClockState::Paused => "paused",
        };
        f.write_str(label)
    }
}

/// Accounting for the current run. Epochs only exist in the states where
/// they mean something.
#[derive(Clone, Copy, Debug)]
enum Phase {
    Stopped,
    Running {
        start_epoch: Instant,
        total_paused: Duration,
    },
    Paused {
        start_epoch: Instant,
        paused_epoch: Instant,
        total_paused: Duration,
    },
}

/// Start/pause/resume/stop clock over a wall-clock source
pub struct Clock<S: TimeSource = SystemTimeSource> {
    source: S,
    phase: Phase,
}

impl Clock<SystemTimeSource> {
    /// Create a stopped clock over the OS clock
    pub fn new() -> Self {
        Self::with_source(SystemTimeSource)
    }
}

impl Default for Clock<SystemTimeSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TimeSource> Clock<S> {
    /// Create a stopped clock over a custom wall-clock source
    pub fn with_source(source: S) -> Self {
        Clock {
            source,
            phase: Phase::Stopped,
        }
    }

    pub fn state(&self) -> ClockState {
        match self.phase {
            Phase::Stopped => ClockState::Stopped,
            Phase::Running { .. } => ClockState::Running,
            Phase::Paused { .. } => ClockState::Paused,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Begin a fresh run, or resume a paused one. No-op while running.
    pub fn start(&mut self) {
        let now = self.source.now();
        self.phase = match self.phase {
            Phase::Stopped => {
                tracing::debug!("clock started");
                Phase::Running {
                    start_epoch: now,
                    total_paused: Duration::ZERO,
                }
            }
            Phase::Paused {
                start_epoch,
                paused_epoch,
                total_paused,
            } => {
                let pause = now.saturating_duration_since(paused_epoch);
                tracing::debug!(paused_for = ?pause, "clock resumed");
                Phase::Running {
                    start_epoch,
                    total_paused: total_paused + pause,
                }
            }
            running @ Phase::Running { .. } => {
                tracing::trace!("start ignored: clock already running");
                running
            }
        };
    }

    /// Freeze simulation time. Only meaningful while running.
    pub fn pause(&mut self) {
        match self.phase {
            Phase::Running {
                start_epoch,
                total_paused,
            } => {
                self.phase = Phase::Paused {
                    start_epoch,
                    paused_epoch: self.source.now(),
                    total_paused,
                };
                tracing::debug!("clock paused");
            }
            _ => tracing::trace!(state = %self.state(), "pause ignored"),
        }
    }

    /// End the run. The next start begins again at zero.
    pub fn stop(&mut self) {
        if matches!(self.phase, Phase::Stopped) {
            tracing::trace!("stop ignored: clock already stopped");
            return;
        }
        self.phase = Phase::Stopped;
        tracing::debug!("clock stopped");
    }

    /// Simulation time of the current run
    pub fn elapsed(&self) -> SimTime {
        let active = match self.phase {
            Phase::Stopped => Duration::ZERO,
            Phase::Running {
                start_epoch,
                total_paused,
            } => self
                .source
                .now()
                .saturating_duration_since(start_epoch)
                .saturating_sub(total_paused),
            Phase::Paused {
                start_epoch,
                paused_epoch,
                total_paused,
            } => paused_epoch
                .saturating_duration_since(start_epoch)
                .saturating_sub(total_paused),
        };
        SimTime::from_duration(active)
    }
}
