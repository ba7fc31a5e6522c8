//! Simulation time primitives
//!
//! Simulation time is measured from the start of the current run. It never
//! goes below zero and resets whenever the clock is stopped.

use std::fmt;
use std::ops::{Add, Sub};
use std::time::Duration;

use serde::Serialize;

/// Span of the timeline scrubber. Marker placement assumes the scrubber's
/// maximum equals this value.
pub const TIMELINE_HORIZON: SimTime = SimTime::from_secs(100);

/// Simulation time, in microseconds since the run's start epoch
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);
    pub const MAX: SimTime = SimTime(u64::MAX);

    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        SimTime(micros)
    }

    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        SimTime(millis * 1000)
    }

    #[inline]
    pub const fn from_secs(secs: u64) -> Self {
        SimTime(secs * 1_000_000)
    }

    /// Negative and NaN inputs map to zero, overly large ones saturate.
    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        SimTime((secs * 1_000_000.0).round() as u64)
    }

    #[inline]
    pub fn from_duration(d: Duration) -> Self {
        SimTime(u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
    }

    #[inline]
    pub fn as_micros(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0 / 1000
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    #[inline]
    pub fn as_duration(self) -> Duration {
        Duration::from_micros(self.0)
    }

    /// Distance between two times regardless of order
    #[inline]
    pub fn abs_diff(self, other: SimTime) -> Duration {
        Duration::from_micros(self.0.abs_diff(other.0))
    }

    #[inline]
    pub fn saturating_add(self, d: Duration) -> Self {
        SimTime(self.0.saturating_add(SimTime::from_duration(d).0))
    }

    #[inline]
    pub fn saturating_sub(self, d: Duration) -> Self {
        SimTime(self.0.saturating_sub(SimTime::from_duration(d).0))
    }

    /// Fraction of `span` covered by this time, clamped to `[0, 1]`.
    /// A zero span yields 0.
    pub fn fraction_of(self, span: SimTime) -> f64 {
        if span.0 == 0 {
            return 0.0;
        }
        (self.0 as f64 / span.0 as f64).clamp(0.0, 1.0)
    }

    /// Wall-clock style rendering (HH:MM:SS)
    pub fn timecode(self) -> Timecode {
        Timecode(self)
    }
}

impl Add<Duration> for SimTime {
    type Output = SimTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub<SimTime> for SimTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: SimTime) -> Self::Output {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Debug for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sim({:.3}s)", self.as_secs_f64())
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}s", self.as_secs_f64())
    }
}

/// HH:MM:SS view of a simulation time, whole seconds truncated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timecode(pub SimTime);

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.as_micros() / 1_000_000;
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;
        write!(f, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_secs_f64_clamps_negative() {
        assert_eq!(SimTime::from_secs_f64(-3.5), SimTime::ZERO);
        assert_eq!(SimTime::from_secs_f64(f64::NAN), SimTime::ZERO);
        assert_eq!(SimTime::from_secs_f64(1.25), SimTime::from_millis(1250));
    }

    #[test]
    fn test_timecode() {
        assert_eq!(SimTime::ZERO.timecode().to_string(), "00:00:00");
        assert_eq!(SimTime::from_secs_f64(42.9).timecode().to_string(), "00:00:42");
        assert_eq!(SimTime::from_secs(3723).timecode().to_string(), "01:02:03");
    }

    #[test]
    fn test_fraction_of_horizon() {
        assert_eq!(SimTime::from_secs(25).fraction_of(TIMELINE_HORIZON), 0.25);
        assert_eq!(SimTime::from_secs(250).fraction_of(TIMELINE_HORIZON), 1.0);
        assert_eq!(SimTime::from_secs(5).fraction_of(SimTime::ZERO), 0.0);
    }

    #[test]
    fn test_sub_saturates() {
        let a = SimTime::from_millis(100);
        let b = SimTime::from_millis(300);
        assert_eq!(b - a, Duration::from_millis(200));
        assert_eq!(a - b, Duration::ZERO);
        assert_eq!(a.abs_diff(b), Duration::from_millis(200));
    }

    proptest::proptest! {
        #[test]
        fn prop_fraction_stays_in_unit_range(t in 0u64..10_000_000_000, span in 0u64..1_000_000_000) {
            let f = SimTime(t).fraction_of(SimTime(span));
            proptest::prop_assert!((0.0..=1.0).contains(&f));
        }
    }
}
