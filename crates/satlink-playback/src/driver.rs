//! Playback Driver - per-tick resolution of simulation time into views

use std::collections::HashSet;
use std::time::{Duration, Instant};

use satlink_core::{EventMarker, SatlinkResult, SimTime, TimelineEvent};
use satlink_time::{Clock, ClockState, SystemTimeSource, TimeSource};
use satlink_timeline::TimelineStore;

use crate::{
    ChartSet, PlaybackConfig, PoseChannels, Readout, RenderSink, RenderTarget, SampleSlot,
    ScrubCursor, SpotChannels, SpotOffset, Terminal, TerminalPose,
};

#[derive(Clone, Debug, Default)]
pub struct PlaybackStats {
    pub ticks: u64,
    pub frame_hits: u64,
    pub fallback_ticks: u64,
    pub injected_events: u64,
    pub last_tick_duration: Duration,
}

/// What one tick did
#[derive(Clone, Debug)]
pub struct TickReport {
    pub display_time: SimTime,
    pub state: ClockState,
    /// A sample frame matched; false means synthetic motion was used
    pub frame_matched: bool,
    pub injected: Option<TimelineEvent>,
    /// The log target received a new visible list
    pub log_rendered: bool,
}

/// Tracks render targets that reported themselves missing so each one is
/// warned about once.
#[derive(Debug, Default)]
struct TargetHealth {
    missing: HashSet<RenderTarget>,
}

impl TargetHealth {
    fn check(&mut self, target: RenderTarget, result: SatlinkResult<()>) {
        match result {
            Ok(()) => {
                if self.missing.remove(&target) {
                    tracing::info!(%target, "render target available again");
                }
            }
            Err(e) => {
                if self.missing.insert(target) {
                    tracing::warn!(%target, error = %e, "render target unavailable, skipping");
                } else {
                    tracing::debug!(%target, "render target still unavailable");
                }
            }
        }
    }
}

/// Owns the clock, the timeline and the scrub cursor. Ticks and operator
/// commands are the only writers.
pub struct PlaybackDriver<S: TimeSource = SystemTimeSource> {
    clock: Clock<S>,
    timeline: TimelineStore,
    cursor: ScrubCursor,
    charts: ChartSet,
    samples: SampleSlot,
    /// Visible count last pushed to the log target
    rendered_log_count: Option<usize>,
    health: TargetHealth,
    stats: PlaybackStats,
    config: PlaybackConfig,
}

impl PlaybackDriver<SystemTimeSource> {
    pub fn new(config: PlaybackConfig) -> Self {
        Self::with_source(config, SystemTimeSource)
    }
}

impl<S: TimeSource> PlaybackDriver<S> {
    /// Create a driver over a custom wall-clock source. The timeline is
    /// seeded with its bootstrap entries.
    pub fn with_source(config: PlaybackConfig, source: S) -> Self {
        let mut timeline = TimelineStore::with_config(config.timeline_config());
        timeline.seed();

        PlaybackDriver {
            clock: Clock::with_source(source),
            timeline,
            cursor: ScrubCursor::new(),
            charts: ChartSet::new(&config.chart_channels, config.chart_capacity),
            samples: SampleSlot::new(),
            rendered_log_count: None,
            health: TargetHealth::default(),
            stats: PlaybackStats::default(),
            config,
        }
    }

    /// Share an existing sample slot (e.g. one a loader is filling)
    pub fn with_samples(mut self, samples: SampleSlot) -> Self {
        self.samples = samples;
        self
    }

    pub fn start(&mut self) {
        self.clock.start();
    }

    /// Pause, freezing the display at the moment of the pause
    pub fn pause(&mut self) {
        if self.clock.state().is_running() {
            self.cursor.track(self.clock.elapsed());
        }
        self.clock.pause();
    }

    /// Stop, freezing the display at the last running value
    pub fn stop(&mut self) {
        if self.clock.state().is_running() {
            self.cursor.track(self.clock.elapsed());
        }
        self.clock.stop();
    }

    /// Scrubber grabbed at `secs`
    pub fn begin_scrub(&mut self, secs: f64) {
        let t = self.scrub_position(secs);
        self.cursor.begin_drag(t);
    }

    /// Scrubber moved to `secs`
    pub fn scrub_to(&mut self, secs: f64) {
        let t = self.scrub_position(secs);
        self.cursor.drag_to(t);
    }

    /// Scrubber released. Clock tracking resumes on the next tick if running.
    pub fn end_scrub(&mut self) {
        self.cursor.end_drag();
    }

    fn scrub_position(&self, secs: f64) -> SimTime {
        SimTime::from_secs_f64(secs).min(self.config.horizon)
    }

    /// Drop an operator marker at the current simulation time
    pub fn mark_event<R: RenderSink>(
        &mut self,
        label: &str,
        sink: &mut R,
    ) -> SatlinkResult<EventMarker> {
        let state = self.clock.state();
        let now = self.clock.elapsed();
        let marker = self.timeline.mark_user_event(label, state, now)?.clone();
        self.health.check(RenderTarget::Markers, sink.marker(&marker));
        Ok(marker)
    }

    /// Run one tick
    pub fn tick<R: RenderSink>(&mut self, sink: &mut R) -> TickReport {
        let started = Instant::now();
        self.stats.ticks += 1;

        // 1. clock tracking
        let state = self.clock.state();
        if state.is_running() {
            self.cursor.track(self.clock.elapsed());
        }
        let t = self.cursor.display_time();

        // 2. telemetry injection
        let injected = self.timeline.inject_random_event(state, t).cloned();
        if injected.is_some() {
            self.stats.injected_events += 1;
        }

        // 3. frame or synthetic motion
        let frame_matched = self.render_frame(t, sink);
        if frame_matched {
            self.stats.frame_hits += 1;
        } else {
            self.stats.fallback_ticks += 1;
        }

        // 4. event log
        let log_rendered = self.render_log(t, sink);

        // 5. readouts
        let readout = Readout {
            display_time: t,
            timecode: t.timecode().to_string(),
            state,
            scrubber: t.fraction_of(self.config.horizon),
            dragging: self.cursor.is_dragging(),
        };
        self.health.check(RenderTarget::Readout, sink.readout(&readout));

        self.stats.last_tick_duration = started.elapsed();

        TickReport {
            display_time: t,
            state,
            frame_matched,
            injected,
            log_rendered,
        }
    }

    fn render_frame<R: RenderSink>(&mut self, t: SimTime, sink: &mut R) -> bool {
        let table = self.samples.current();
        let frame = table
            .as_deref()
            .and_then(|table| table.nearest(t, self.config.sample_tolerance));

        let Some(frame) = frame else {
            for &terminal in Terminal::all() {
                let pose = TerminalPose::synthetic(terminal, t);
                self.health.check(RenderTarget::Scene, sink.pose(terminal, pose));
            }
            return false;
        };

        for &terminal in Terminal::all() {
            let pose = TerminalPose::from_frame(&frame, self.pose_channels(terminal))
                .unwrap_or_else(|| TerminalPose::synthetic(terminal, t));
            self.health.check(RenderTarget::Scene, sink.pose(terminal, pose));

            if let Some(offset) = SpotOffset::from_frame(&frame, self.spot_channels(terminal)) {
                self.health.check(RenderTarget::Spots, sink.spot(terminal, offset));
            }
        }

        for (channel, series) in self.charts.iter_mut() {
            let Some(value) = frame.channel(channel) else {
                continue;
            };
            if series.push(frame.time, value) {
                self.health.check(RenderTarget::Chart, sink.chart(channel, series));
            }
        }

        true
    }

    /// Push the visible log if its size changed since the last delivered
    /// push. A rejected push leaves the count stale so the next tick retries.
    fn render_log<R: RenderSink>(&mut self, t: SimTime, sink: &mut R) -> bool {
        let count = self.timeline.visible_up_to(t).count();
        if self.rendered_log_count == Some(count) {
            return false;
        }

        let visible: Vec<&TimelineEvent> = self.timeline.visible_up_to(t).collect();
        let result = sink.log(&visible);
        let delivered = result.is_ok();
        if delivered {
            self.rendered_log_count = Some(count);
        }
        self.health.check(RenderTarget::Log, result);
        delivered
    }

    fn pose_channels(&self, terminal: Terminal) -> &PoseChannels {
        match terminal {
            Terminal::Transmit => &self.config.tx_pose,
            Terminal::Receive => &self.config.rx_pose,
        }
    }

    fn spot_channels(&self, terminal: Terminal) -> &SpotChannels {
        match terminal {
            Terminal::Transmit => &self.config.tx_spot,
            Terminal::Receive => &self.config.rx_spot,
        }
    }

    pub fn clock(&self) -> &Clock<S> {
        &self.clock
    }

    pub fn timeline(&self) -> &TimelineStore {
        &self.timeline
    }

    pub fn cursor(&self) -> &ScrubCursor {
        &self.cursor
    }

    pub fn display_time(&self) -> SimTime {
        self.cursor.display_time()
    }

    pub fn charts(&self) -> &ChartSet {
        &self.charts
    }

    pub fn samples(&self) -> &SampleSlot {
        &self.samples
    }

    pub fn stats(&self) -> &PlaybackStats {
        &self.stats
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }
}
