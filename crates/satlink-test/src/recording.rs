//! Render sink that records everything it receives

use std::collections::HashSet;

use satlink_core::{EventMarker, SatlinkError, SatlinkResult, TimelineEvent};
use satlink_playback::{
    ChartPoint, ChartSeries, Readout, RenderSink, RenderTarget, SpotOffset, Terminal,
    TerminalPose,
};

/// Captured view updates. Targets listed in `missing` reject their updates
/// the way an absent view would.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub poses: Vec<(Terminal, TerminalPose)>,
    /// Snapshot of each series as rendered
    pub charts: Vec<(String, Vec<ChartPoint>)>,
    pub spots: Vec<(Terminal, SpotOffset)>,
    /// Messages of each pushed log
    pub logs: Vec<Vec<String>>,
    pub markers: Vec<EventMarker>,
    pub readouts: Vec<Readout>,
    missing: HashSet<RenderTarget>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink with the given targets absent
    pub fn without(targets: &[RenderTarget]) -> Self {
        RecordingSink {
            missing: targets.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn last_readout(&self) -> Option<&Readout> {
        self.readouts.last()
    }

    pub fn last_log(&self) -> Option<&[String]> {
        self.logs.last().map(|l| l.as_slice())
    }

    fn available(&self, target: RenderTarget) -> SatlinkResult<()> {
        if self.missing.contains(&target) {
            Err(SatlinkError::RenderTargetMissing(target.to_string()))
        } else {
            Ok(())
        }
    }
}

impl RenderSink for RecordingSink {
    fn pose(&mut self, terminal: Terminal, pose: TerminalPose) -> SatlinkResult<()> {
        self.available(RenderTarget::Scene)?;
        self.poses.push((terminal, pose));
        Ok(())
    }

    fn chart(&mut self, channel: &str, series: &ChartSeries) -> SatlinkResult<()> {
        self.available(RenderTarget::Chart)?;
        self.charts
            .push((channel.to_string(), series.points().copied().collect()));
        Ok(())
    }

    fn spot(&mut self, terminal: Terminal, offset: SpotOffset) -> SatlinkResult<()> {
        self.available(RenderTarget::Spots)?;
        self.spots.push((terminal, offset));
        Ok(())
    }

    fn log(&mut self, visible: &[&TimelineEvent]) -> SatlinkResult<()> {
        self.available(RenderTarget::Log)?;
        self.logs
            .push(visible.iter().map(|e| e.message.clone()).collect());
        Ok(())
    }

    fn marker(&mut self, marker: &EventMarker) -> SatlinkResult<()> {
        self.available(RenderTarget::Markers)?;
        self.markers.push(marker.clone());
        Ok(())
    }

    fn readout(&mut self, readout: &Readout) -> SatlinkResult<()> {
        self.available(RenderTarget::Readout)?;
        self.readouts.push(readout.clone());
        Ok(())
    }
}
