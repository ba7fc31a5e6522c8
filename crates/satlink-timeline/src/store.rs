//! Timeline Store - append-only event log
//!
//! Growth policy: the log is unbounded for the lifetime of the process.
//! Entries are never evicted, because the scrubber must be able to show any
//! past moment. Long sessions are surfaced through a periodic warning
//! instead.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use satlink_core::{EventMarker, SatlinkError, SatlinkResult, SimTime, TimelineEvent, TIMELINE_HORIZON};
use satlink_time::ClockState;

use crate::telemetry;

/// Timeline Store configuration
#[derive(Clone, Debug)]
pub struct TimelineConfig {
    /// Chance of injecting a telemetry entry on each running tick
    pub event_probability: f64,
    /// Span the marker strip is normalized against
    pub horizon: SimTime,
    /// Emit a growth warning every time the log crosses a multiple of this
    pub growth_warning_step: usize,
    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        TimelineConfig {
            event_probability: 0.02,
            horizon: TIMELINE_HORIZON,
            growth_warning_step: 10_000,
            seed: None,
        }
    }
}

/// Append-only log plus the marker strip
pub struct TimelineStore {
    events: Vec<TimelineEvent>,
    markers: Vec<EventMarker>,
    rng: StdRng,
    growth_warnings: usize,
    config: TimelineConfig,
}

impl TimelineStore {
    pub fn new() -> Self {
        Self::with_config(TimelineConfig::default())
    }

    pub fn with_config(config: TimelineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        TimelineStore {
            events: Vec::new(),
            markers: Vec::new(),
            rng,
            growth_warnings: 0,
            config,
        }
    }

    /// Write the bootstrap entries shown before any run
    pub fn seed(&mut self) {
        self.append(TimelineEvent::seed("System initialized"));
        self.append(TimelineEvent::seed("Awaiting parameter configuration"));
    }

    /// Add an event at the end of the log
    pub fn append(&mut self, event: TimelineEvent) {
        self.events.push(event);

        let step = self.config.growth_warning_step;
        if step > 0 && self.events.len() % step == 0 {
            self.growth_warnings += 1;
            tracing::warn!(events = self.events.len(), "timeline log keeps growing");
        }
    }

    /// Events stamped at or before `cursor`, in log order.
    /// Recomputed from the full log on every call.
    pub fn visible_up_to(
        &self,
        cursor: SimTime,
    ) -> impl Iterator<Item = &TimelineEvent> + Clone + '_ {
        self.events.iter().filter(move |e| e.time <= cursor)
    }

    /// Roll for a telemetry entry. Only rolls while running.
    pub fn inject_random_event(
        &mut self,
        state: ClockState,
        sim_time: SimTime,
    ) -> Option<&TimelineEvent> {
        if !state.is_running() {
            return None;
        }
        let probability = self.injection_probability();
        if !self.rng.gen_bool(probability) {
            return None;
        }

        let message = telemetry::synthesize(&mut self.rng);
        tracing::trace!(time = %sim_time, %message, "telemetry injected");
        self.append(TimelineEvent::telemetry(sim_time, message));
        self.events.last()
    }

    /// Record an operator marker. Rejected unless the clock is running.
    pub fn mark_user_event(
        &mut self,
        label: &str,
        state: ClockState,
        sim_time: SimTime,
    ) -> SatlinkResult<&EventMarker> {
        if !state.is_running() {
            tracing::warn!(label, %state, "event marker rejected: simulation not running");
            return Err(SatlinkError::NotRunning(label.to_string()));
        }

        self.append(TimelineEvent::user_marker(sim_time, label));
        self.markers
            .push(EventMarker::new(label, sim_time, self.config.horizon));
        tracing::info!(label, time = %sim_time, "event marked");

        // just pushed
        Ok(&self.markers[self.markers.len() - 1])
    }

    /// Configured probability clamped to `[0, 1]`; NaN disables injection
    fn injection_probability(&self) -> f64 {
        let p = self.config.event_probability;
        if p.is_nan() {
            0.0
        } else {
            p.clamp(0.0, 1.0)
        }
    }

    /// Growth warnings emitted so far
    pub fn growth_warnings(&self) -> usize {
        self.growth_warnings
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn markers(&self) -> &[EventMarker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }
}

impl Default for TimelineStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satlink_core::EventKind;

    fn seeded(probability: f64) -> TimelineStore {
        TimelineStore::with_config(TimelineConfig {
            event_probability: probability,
            seed: Some(42),
            ..Default::default()
        })
    }

    #[test]
    fn test_visible_up_to_filters_by_time() {
        let mut store = seeded(0.0);
        store.seed();
        store.append(TimelineEvent::telemetry(SimTime::from_secs(5), "a"));
        store.append(TimelineEvent::telemetry(SimTime::from_secs(10), "b"));

        assert_eq!(store.visible_up_to(SimTime::ZERO).count(), 2);
        assert_eq!(store.visible_up_to(SimTime::from_secs(5)).count(), 3);
        assert_eq!(store.visible_up_to(SimTime::from_secs(60)).count(), 4);

        // restartable
        let visible = store.visible_up_to(SimTime::from_secs(7));
        assert_eq!(visible.clone().count(), visible.count());
    }

    #[test]
    fn test_injection_only_while_running() {
        let mut store = seeded(1.0);
        assert!(store
            .inject_random_event(ClockState::Stopped, SimTime::from_secs(1))
            .is_none());
        assert!(store
            .inject_random_event(ClockState::Paused, SimTime::from_secs(1))
            .is_none());
        assert!(store.is_empty());

        let event = store
            .inject_random_event(ClockState::Running, SimTime::from_secs(3))
            .cloned()
            .unwrap();
        assert_eq!(event.time, SimTime::from_secs(3));
        assert_eq!(event.kind, EventKind::Telemetry);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_injection_rate_near_probability() {
        let mut store = seeded(0.02);
        for i in 0..10_000 {
            store.inject_random_event(ClockState::Running, SimTime::from_millis(i * 100));
        }
        // 200 expected
        assert!(store.len() > 120 && store.len() < 280, "got {}", store.len());
    }

    #[test]
    fn test_invalid_probability_never_panics() {
        for p in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -0.5, 7.0] {
            let mut store = seeded(p);
            for i in 0..100 {
                store.inject_random_event(ClockState::Running, SimTime::from_millis(i * 100));
            }
            match p {
                p if p.is_nan() || p <= 0.0 => assert!(store.is_empty(), "p = {}", p),
                _ => assert_eq!(store.len(), 100, "p = {}", p),
            }
        }
    }

    #[test]
    fn test_growth_warning_on_step_multiples() {
        let mut store = TimelineStore::with_config(TimelineConfig {
            growth_warning_step: 3,
            seed: Some(1),
            ..Default::default()
        });
        for i in 0..2 {
            store.append(TimelineEvent::telemetry(SimTime::from_secs(i), "x"));
        }
        assert_eq!(store.growth_warnings(), 0);

        store.append(TimelineEvent::telemetry(SimTime::from_secs(2), "x"));
        assert_eq!(store.growth_warnings(), 1);

        for i in 3..8 {
            store.append(TimelineEvent::telemetry(SimTime::from_secs(i), "x"));
        }
        // warned at 3 and 6 of 8
        assert_eq!(store.growth_warnings(), 2);
        assert_eq!(store.len(), 8);
    }

    #[test]
    fn test_growth_warning_disabled_with_zero_step() {
        let mut store = TimelineStore::with_config(TimelineConfig {
            growth_warning_step: 0,
            seed: Some(1),
            ..Default::default()
        });
        for i in 0..10 {
            store.append(TimelineEvent::telemetry(SimTime::from_secs(i), "x"));
        }
        assert_eq!(store.growth_warnings(), 0);
    }

    #[test]
    fn test_mark_rejected_when_stopped() {
        let mut store = seeded(0.0);
        store.seed();
        let before = store.len();

        let result = store.mark_user_event("link-loss", ClockState::Stopped, SimTime::from_secs(4));
        assert!(matches!(result, Err(SatlinkError::NotRunning(_))));
        assert_eq!(store.len(), before);
        assert!(store.markers().is_empty());

        assert!(store
            .mark_user_event("link-loss", ClockState::Paused, SimTime::from_secs(4))
            .is_err());
        assert_eq!(store.len(), before);
    }

    #[test]
    fn test_mark_records_event_and_marker() {
        let mut store = seeded(0.0);
        let marker = store
            .mark_user_event("link-loss", ClockState::Running, SimTime::from_secs(25))
            .cloned()
            .unwrap();

        assert_eq!(marker.label, "link-loss");
        assert!((marker.position - 0.25).abs() < 1e-9);

        let last = store.events().last().unwrap();
        assert_eq!(last.kind, EventKind::UserMarker);
        assert_eq!(last.message, "link-loss");
        assert_eq!(last.time, SimTime::from_secs(25));
    }

    proptest::proptest! {
        #[test]
        fn prop_visible_is_monotonic(
            stamps in proptest::collection::vec(0u64..100_000, 0..50),
            t1 in 0u64..100_000,
            t2 in 0u64..100_000,
        ) {
            let mut sorted = stamps;
            sorted.sort_unstable();
            let mut store = seeded(0.0);
            for ms in sorted {
                store.append(TimelineEvent::telemetry(SimTime::from_millis(ms), "x"));
            }

            let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            let early: Vec<_> = store.visible_up_to(SimTime::from_millis(lo)).collect();
            let late: Vec<_> = store.visible_up_to(SimTime::from_millis(hi)).collect();

            proptest::prop_assert!(early.len() <= late.len());
            proptest::prop_assert_eq!(&late[..early.len()], &early[..]);
        }
    }
}
