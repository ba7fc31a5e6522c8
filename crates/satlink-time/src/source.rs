//! Wall-clock sources for the simulation clock

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Supplies the current wall-clock instant
pub trait TimeSource {
    fn now(&self) -> Instant;
}

/// Monotonic OS clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
/// Clones share the same instant, so a test can keep a handle while the
/// clock under test owns another.
#[derive(Clone, Debug)]
pub struct ManualTimeSource {
    now: Arc<Mutex<Instant>>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        ManualTimeSource {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Move the shared instant forward
    pub fn advance(&self, dt: Duration) {
        let mut now = self.now.lock();
        *now += dt;
    }
}

impl Default for ManualTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}
