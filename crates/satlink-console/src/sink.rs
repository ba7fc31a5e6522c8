//! Render sink that reports view updates through tracing

use satlink_core::{EventMarker, SatlinkError, SatlinkResult, TimelineEvent};
use satlink_playback::{
    ChartSeries, Readout, RenderSink, RenderTarget, SpotOffset, Terminal, TerminalPose,
};
use satlink_time::ClockState;

/// Headless rendering: log entries and markers at `info`, readouts at
/// `debug`, per-frame geometry at `trace`.
#[derive(Debug, Default)]
pub struct TracingSink {
    scene_attached: bool,
    logged: usize,
    last_state: Option<ClockState>,
}

impl TracingSink {
    pub fn new() -> Self {
        TracingSink {
            scene_attached: true,
            ..Default::default()
        }
    }

    /// Sink whose 3D scene target is absent
    pub fn headless_scene() -> Self {
        Self::default()
    }
}

impl RenderSink for TracingSink {
    fn pose(&mut self, terminal: Terminal, pose: TerminalPose) -> SatlinkResult<()> {
        if !self.scene_attached {
            return Err(SatlinkError::RenderTargetMissing(RenderTarget::Scene.to_string()));
        }
        tracing::trace!(%terminal, azimuth = pose.azimuth, elevation = pose.elevation, "pose");
        Ok(())
    }

    fn chart(&mut self, channel: &str, series: &ChartSeries) -> SatlinkResult<()> {
        if let Some(point) = series.points().last() {
            tracing::trace!(channel, t = %point.time, value = point.value, "chart");
        }
        Ok(())
    }

    fn spot(&mut self, terminal: Terminal, offset: SpotOffset) -> SatlinkResult<()> {
        tracing::trace!(%terminal, dx = offset.dx, dy = offset.dy, "spot");
        Ok(())
    }

    fn log(&mut self, visible: &[&TimelineEvent]) -> SatlinkResult<()> {
        // scrubbing backwards shrinks the visible list; print from there again
        if visible.len() < self.logged {
            self.logged = visible.len();
        }
        for event in &visible[self.logged..] {
            tracing::info!(target: "satlink::log", t = %event.time, kind = ?event.kind, "{}", event.message);
        }
        self.logged = visible.len();
        Ok(())
    }

    fn marker(&mut self, marker: &EventMarker) -> SatlinkResult<()> {
        tracing::info!(
            target: "satlink::marker",
            label = %marker.label,
            t = %marker.time,
            position = marker.position,
            "marker"
        );
        Ok(())
    }

    fn readout(&mut self, readout: &Readout) -> SatlinkResult<()> {
        if self.last_state != Some(readout.state) {
            tracing::info!(state = %readout.state, timecode = %readout.timecode, "clock");
            self.last_state = Some(readout.state);
        }
        tracing::debug!(
            elapsed = readout.elapsed_secs(),
            timecode = %readout.timecode,
            scrubber = readout.scrubber,
            dragging = readout.dragging,
            "readout"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satlink_core::SimTime;
    use satlink_playback::{PlaybackConfig, PlaybackDriver};
    use satlink_time::ManualTimeSource;
    use std::time::Duration;

    #[test]
    fn test_headless_scene_rejects_pose() {
        let mut sink = TracingSink::headless_scene();
        let pose = TerminalPose::synthetic(Terminal::Transmit, SimTime::from_secs(1));
        assert!(matches!(
            sink.pose(Terminal::Transmit, pose),
            Err(SatlinkError::RenderTargetMissing(_))
        ));
        assert!(TracingSink::new().pose(Terminal::Transmit, pose).is_ok());
    }

    #[test]
    fn test_log_prints_only_new_entries() {
        let a = TimelineEvent::telemetry(SimTime::from_secs(1), "a");
        let b = TimelineEvent::telemetry(SimTime::from_secs(2), "b");
        let mut sink = TracingSink::new();

        sink.log(&[&a]).unwrap();
        assert_eq!(sink.logged, 1);
        sink.log(&[&a, &b]).unwrap();
        assert_eq!(sink.logged, 2);
        sink.log(&[&a]).unwrap();
        assert_eq!(sink.logged, 1);
    }

    #[test]
    fn test_driver_keeps_running_without_scene() {
        let wall = ManualTimeSource::new();
        let mut driver = PlaybackDriver::with_source(PlaybackConfig::deterministic(5), wall.clone());
        let mut sink = TracingSink::headless_scene();
        driver.start();
        for _ in 0..5 {
            wall.advance(Duration::from_millis(100));
            driver.tick(&mut sink);
        }
        assert_eq!(driver.display_time(), SimTime::from_millis(500));
        assert_eq!(driver.stats().ticks, 5);
    }
}
