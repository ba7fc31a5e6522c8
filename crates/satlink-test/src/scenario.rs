//! Scenario Runner - scripted operator sessions over a manual wall clock
//!
//! Simulates:
//! - Clock start/pause/resume/stop cycles
//! - Scrubber drags while running or paused
//! - Operator markers
//! - Loaded or missing sample feeds

use std::time::Duration;

use thiserror::Error;

use satlink_core::SimTime;
use satlink_playback::{PlaybackCommand, PlaybackConfig, PlaybackDriver, SampleTable, TickReport};
use satlink_time::ManualTimeSource;

use crate::RecordingSink;

/// One scripted action
#[derive(Clone, Debug)]
pub enum Step {
    Command(PlaybackCommand),
    /// Advance the wall clock, ticking at the configured interval
    Run(Duration),
    /// Advance the wall clock without ticking
    Wait(Duration),
    /// Run a single tick
    Tick,
    /// Check the scrub cursor
    ExpectDisplay { secs: f64, tolerance: Duration },
    /// Check the clock
    ExpectElapsed { secs: f64, tolerance: Duration },
    /// Check the number of log entries
    ExpectEvents(usize),
}

impl Step {
    pub fn start() -> Self {
        Step::Command(PlaybackCommand::Start)
    }

    pub fn pause() -> Self {
        Step::Command(PlaybackCommand::Pause)
    }

    pub fn stop() -> Self {
        Step::Command(PlaybackCommand::Stop)
    }

    pub fn mark(label: &str) -> Self {
        Step::Command(PlaybackCommand::Mark(label.to_string()))
    }

    pub fn run_secs(secs: f64) -> Self {
        Step::Run(Duration::from_secs_f64(secs))
    }

    pub fn wait_secs(secs: f64) -> Self {
        Step::Wait(Duration::from_secs_f64(secs))
    }

    pub fn expect_elapsed(secs: f64) -> Self {
        Step::ExpectElapsed {
            secs,
            tolerance: Duration::from_millis(200),
        }
    }

    pub fn expect_display(secs: f64) -> Self {
        Step::ExpectDisplay {
            secs,
            tolerance: Duration::from_millis(200),
        }
    }
}

/// A failed expectation
#[derive(Error, Debug, PartialEq)]
pub enum ScenarioError {
    #[error("step {step}: display time {actual:?}, expected {expected:?}")]
    DisplayMismatch {
        step: usize,
        expected: SimTime,
        actual: SimTime,
    },

    #[error("step {step}: clock elapsed {actual:?}, expected {expected:?}")]
    ElapsedMismatch {
        step: usize,
        expected: SimTime,
        actual: SimTime,
    },

    #[error("step {step}: {actual} log entries, expected {expected}")]
    EventCountMismatch {
        step: usize,
        expected: usize,
        actual: usize,
    },
}

/// Outcome of a scripted session
#[derive(Debug, Default)]
pub struct ScenarioResult {
    pub ticks: u64,
    pub frame_hits: u64,
    pub fallback_ticks: u64,
    pub injected_events: u64,
    pub log_renders: usize,
}

/// Playback driver plus the wall clock that feeds it
pub struct ScenarioRunner {
    wall: ManualTimeSource,
    driver: PlaybackDriver<ManualTimeSource>,
    sink: RecordingSink,
}

impl ScenarioRunner {
    pub fn new(config: PlaybackConfig) -> Self {
        Self::with_sink(config, RecordingSink::new())
    }

    pub fn with_sink(config: PlaybackConfig, sink: RecordingSink) -> Self {
        let wall = ManualTimeSource::new();
        ScenarioRunner {
            driver: PlaybackDriver::with_source(config, wall.clone()),
            wall,
            sink,
        }
    }

    /// Install a sample table before the run
    pub fn with_feed(self, table: SampleTable) -> Self {
        self.driver.samples().install(table);
        self
    }

    pub fn apply(&mut self, command: PlaybackCommand) {
        self.driver.apply(command, &mut self.sink);
    }

    pub fn tick(&mut self) -> TickReport {
        self.driver.tick(&mut self.sink)
    }

    /// Advance wall time by `dt` in tick-sized steps, ticking after each
    pub fn run(&mut self, dt: Duration) -> Option<TickReport> {
        let interval = self.driver.config().tick_interval;
        let mut remaining = dt;
        let mut last = None;
        while !remaining.is_zero() {
            let step = remaining.min(interval);
            self.wall.advance(step);
            remaining -= step;
            last = Some(self.tick());
        }
        last
    }

    /// Advance wall time without ticking
    pub fn wait(&mut self, dt: Duration) {
        self.wall.advance(dt);
    }

    /// Execute a script, stopping at the first failed expectation
    pub fn run_script(&mut self, steps: &[Step]) -> Result<ScenarioResult, ScenarioError> {
        for (i, step) in steps.iter().enumerate() {
            match step {
                Step::Command(command) => self.apply(command.clone()),
                Step::Run(dt) => {
                    self.run(*dt);
                }
                Step::Wait(dt) => self.wait(*dt),
                Step::Tick => {
                    self.tick();
                }
                Step::ExpectDisplay { secs, tolerance } => {
                    let expected = SimTime::from_secs_f64(*secs);
                    let actual = self.driver.display_time();
                    if actual.abs_diff(expected) > *tolerance {
                        return Err(ScenarioError::DisplayMismatch {
                            step: i,
                            expected,
                            actual,
                        });
                    }
                }
                Step::ExpectElapsed { secs, tolerance } => {
                    let expected = SimTime::from_secs_f64(*secs);
                    let actual = self.driver.clock().elapsed();
                    if actual.abs_diff(expected) > *tolerance {
                        return Err(ScenarioError::ElapsedMismatch {
                            step: i,
                            expected,
                            actual,
                        });
                    }
                }
                Step::ExpectEvents(expected) => {
                    let actual = self.driver.timeline().len();
                    if actual != *expected {
                        return Err(ScenarioError::EventCountMismatch {
                            step: i,
                            expected: *expected,
                            actual,
                        });
                    }
                }
            }
        }
        Ok(self.result())
    }

    pub fn result(&self) -> ScenarioResult {
        let stats = self.driver.stats();
        ScenarioResult {
            ticks: stats.ticks,
            frame_hits: stats.frame_hits,
            fallback_ticks: stats.fallback_ticks,
            injected_events: stats.injected_events,
            log_renders: self.sink.logs.len(),
        }
    }

    pub fn driver(&self) -> &PlaybackDriver<ManualTimeSource> {
        &self.driver
    }

    pub fn sink(&self) -> &RecordingSink {
        &self.sink
    }
}

/// Predefined operator sessions
pub mod scenarios {
    use super::*;

    /// Start and let five seconds pass
    pub fn steady_run() -> Vec<Step> {
        vec![
            Step::start(),
            Step::run_secs(5.0),
            Step::expect_elapsed(5.0),
            Step::expect_display(5.0),
        ]
    }

    /// Start, run 2s, pause 3s, resume
    pub fn pause_resume() -> Vec<Step> {
        vec![
            Step::start(),
            Step::run_secs(2.0),
            Step::pause(),
            Step::run_secs(3.0),
            Step::expect_display(2.0),
            Step::start(),
            Step::expect_elapsed(2.0),
        ]
    }

    /// Drag to 42s while running, then release
    pub fn scrub_while_running() -> Vec<Step> {
        vec![
            Step::start(),
            Step::run_secs(3.0),
            Step::Command(PlaybackCommand::BeginScrub(42.0)),
            Step::run_secs(1.0),
            Step::expect_display(42.0),
            Step::expect_elapsed(4.0),
            Step::Command(PlaybackCommand::EndScrub),
            Step::Tick,
            Step::expect_display(4.0),
        ]
    }

    /// Try to mark a link loss before the run starts
    pub fn mark_while_stopped(seed_events: usize) -> Vec<Step> {
        vec![
            Step::mark("link-loss"),
            Step::ExpectEvents(seed_events),
            Step::Tick,
            Step::ExpectEvents(seed_events),
        ]
    }

    /// Run, stop, start again from zero
    pub fn stop_restart() -> Vec<Step> {
        vec![
            Step::start(),
            Step::run_secs(4.0),
            Step::stop(),
            Step::wait_secs(2.0),
            Step::start(),
            Step::ExpectElapsed {
                secs: 0.0,
                tolerance: Duration::from_millis(1),
            },
            Step::run_secs(1.0),
            Step::expect_display(1.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic_feed;
    use satlink_playback::RenderTarget;

    fn runner() -> ScenarioRunner {
        ScenarioRunner::new(PlaybackConfig::deterministic(11))
    }

    #[test]
    fn test_steady_run() {
        let result = runner().run_script(&scenarios::steady_run()).unwrap();
        assert_eq!(result.ticks, 50);
        assert_eq!(result.fallback_ticks, 50);
    }

    #[test]
    fn test_pause_resume() {
        runner().run_script(&scenarios::pause_resume()).unwrap();
    }

    #[test]
    fn test_scrub_while_running() {
        runner().run_script(&scenarios::scrub_while_running()).unwrap();
    }

    #[test]
    fn test_mark_while_stopped() {
        let mut runner = runner();
        let seeded = runner.driver().timeline().len();
        runner
            .run_script(&scenarios::mark_while_stopped(seeded))
            .unwrap();
        assert!(runner.driver().timeline().markers().is_empty());
        assert!(runner.sink().markers.is_empty());
    }

    #[test]
    fn test_stop_restart() {
        runner().run_script(&scenarios::stop_restart()).unwrap();
    }

    #[test]
    fn test_failed_expectation_reports_step() {
        let err = runner()
            .run_script(&[Step::start(), Step::run_secs(1.0), Step::expect_elapsed(9.0)])
            .unwrap_err();
        assert!(matches!(err, ScenarioError::ElapsedMismatch { step: 2, .. }));
    }

    #[test]
    fn test_feed_drives_charts() {
        let feed = synthetic_feed(Duration::from_secs(20), Duration::from_millis(100), 5);
        let mut runner = runner().with_feed(SampleTable::parse(&feed).unwrap());

        let result = runner
            .run_script(&[Step::start(), Step::run_secs(10.0)])
            .unwrap();
        assert_eq!(result.frame_hits, result.ticks);

        let snr = runner.driver().charts().get("snr_db").unwrap();
        assert_eq!(snr.len(), 50);
        assert!(!runner.sink().spots.is_empty());
    }

    #[test]
    fn test_feed_ends_falls_back_to_synthetic() {
        let feed = synthetic_feed(Duration::from_secs(1), Duration::from_millis(100), 5);
        let mut runner = runner().with_feed(SampleTable::parse(&feed).unwrap());

        let report = runner.run_script(&[Step::start(), Step::run_secs(3.0)]).unwrap();
        assert!(report.frame_hits >= 10);
        assert!(report.fallback_ticks >= 19);
    }

    #[test]
    fn test_marker_reaches_strip() {
        let mut runner = runner();
        runner
            .run_script(&[Step::start(), Step::run_secs(25.0), Step::mark("link-loss"), Step::Tick])
            .unwrap();

        let marker = &runner.sink().markers[0];
        assert_eq!(marker.label, "link-loss");
        assert!((marker.position - 0.25).abs() < 0.01);
        assert_eq!(runner.sink().last_log().unwrap().last().unwrap(), "link-loss");
    }

    #[test]
    fn test_headless_scene_keeps_running() {
        let sink = RecordingSink::without(&[RenderTarget::Scene, RenderTarget::Log]);
        let mut runner = ScenarioRunner::with_sink(PlaybackConfig::deterministic(2), sink);
        runner.run_script(&scenarios::steady_run()).unwrap();

        assert!(runner.sink().poses.is_empty());
        assert!(runner.sink().logs.is_empty());
        assert_eq!(runner.sink().last_readout().unwrap().timecode, "00:00:05");
    }

    #[test]
    fn test_injection_while_running_only() {
        let config = PlaybackConfig {
            event_probability: 1.0,
            seed: Some(4),
            ..Default::default()
        };
        let mut runner = ScenarioRunner::new(config);
        let seeded = runner.driver().timeline().len();

        runner.run_script(&[Step::run_secs(1.0)]).unwrap();
        assert_eq!(runner.driver().timeline().len(), seeded);

        let result = runner.run_script(&[Step::start(), Step::run_secs(1.0)]).unwrap();
        assert_eq!(result.injected_events, 10);
        assert_eq!(runner.driver().timeline().len(), seeded + 10);
    }

    fn operator_step() -> impl proptest::strategy::Strategy<Value = Step> {
        use proptest::prelude::*;
        prop_oneof![
            Just(Step::start()),
            Just(Step::pause()),
            Just(Step::stop()),
            Just(Step::Command(PlaybackCommand::EndScrub)),
            (0.0..120.0f64).prop_map(|s| Step::Command(PlaybackCommand::Scrub(s))),
            (1u64..1_500).prop_map(|ms| Step::Run(Duration::from_millis(ms))),
        ]
    }

    proptest::proptest! {
        #[test]
        fn prop_running_display_follows_clock(steps in proptest::collection::vec(operator_step(), 1..40)) {
            let mut runner = runner();
            runner.run_script(&steps).unwrap();

            let report = runner.tick();
            let driver = runner.driver();
            if report.state.is_running() && !driver.cursor().is_dragging() {
                proptest::prop_assert_eq!(report.display_time, driver.clock().elapsed());
            }
            proptest::prop_assert!(report.display_time <= driver.config().horizon
                || !driver.cursor().is_dragging());
        }
    }
}
