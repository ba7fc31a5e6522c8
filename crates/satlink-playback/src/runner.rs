//! Async tick loop

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use satlink_time::TimeSource;

use crate::{PlaybackDriver, RenderSink};

/// Operator input applied between ticks
#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackCommand {
    Start,
    Pause,
    Stop,
    /// Scrubber grabbed at the given seconds
    BeginScrub(f64),
    /// Scrubber dragged to the given seconds
    Scrub(f64),
    EndScrub,
    /// Drop an event marker with this label
    Mark(String),
}

pub type CommandSender = mpsc::Sender<PlaybackCommand>;
pub type CommandReceiver = mpsc::Receiver<PlaybackCommand>;

impl<S: TimeSource> PlaybackDriver<S> {
    /// Apply one operator command
    pub fn apply<R: RenderSink>(&mut self, command: PlaybackCommand, sink: &mut R) {
        tracing::debug!(?command, "playback command");
        match command {
            PlaybackCommand::Start => self.start(),
            PlaybackCommand::Pause => self.pause(),
            PlaybackCommand::Stop => self.stop(),
            PlaybackCommand::BeginScrub(secs) => self.begin_scrub(secs),
            PlaybackCommand::Scrub(secs) => self.scrub_to(secs),
            PlaybackCommand::EndScrub => self.end_scrub(),
            PlaybackCommand::Mark(label) => {
                // rejection is already logged by the timeline
                let _ = self.mark_event(&label, sink);
            }
        }
    }
}

/// Tick `driver` at its configured interval, applying commands as they
/// arrive. Returns once every command sender has been dropped.
pub async fn run_playback<S, R>(
    driver: &mut PlaybackDriver<S>,
    sink: &mut R,
    mut commands: CommandReceiver,
) where
    S: TimeSource,
    R: RenderSink,
{
    let mut interval = tokio::time::interval(driver.config().tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(interval = ?driver.config().tick_interval, "playback loop started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                driver.tick(sink);
            }
            command = commands.recv() => match command {
                Some(command) => driver.apply(command, sink),
                None => break,
            },
        }
    }

    tracing::info!(ticks = driver.stats().ticks, "playback loop finished");
}
