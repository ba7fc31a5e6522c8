//! Playback configuration

use std::time::Duration;

use satlink_core::{SimTime, TIMELINE_HORIZON};
use satlink_timeline::TimelineConfig;

/// Azimuth/elevation channel names for one terminal (degrees in the feed)
#[derive(Clone, Debug)]
pub struct PoseChannels {
    pub azimuth: String,
    pub elevation: String,
}

impl PoseChannels {
    pub fn new(azimuth: &str, elevation: &str) -> Self {
        PoseChannels {
            azimuth: azimuth.to_string(),
            elevation: elevation.to_string(),
        }
    }
}

/// Spot-offset channel names for one terminal
#[derive(Clone, Debug)]
pub struct SpotChannels {
    pub dx: String,
    pub dy: String,
}

impl SpotChannels {
    pub fn new(dx: &str, dy: &str) -> Self {
        SpotChannels {
            dx: dx.to_string(),
            dy: dy.to_string(),
        }
    }
}

/// Playback Driver configuration
#[derive(Clone, Debug)]
pub struct PlaybackConfig {
    /// Tick interval
    pub tick_interval: Duration,
    /// Half-width of the nearest-sample window
    pub sample_tolerance: Duration,
    /// Points kept per chart series
    pub chart_capacity: usize,
    /// Telemetry injection chance per running tick
    pub event_probability: f64,
    /// Scrubber span
    pub horizon: SimTime,
    /// Transmit terminal pose channels
    pub tx_pose: PoseChannels,
    /// Receive terminal pose channels
    pub rx_pose: PoseChannels,
    /// Channels plotted as chart series
    pub chart_channels: Vec<String>,
    pub tx_spot: SpotChannels,
    pub rx_spot: SpotChannels,
    /// Fixed RNG seed for telemetry injection
    pub seed: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            tick_interval: Duration::from_millis(100),
            sample_tolerance: Duration::from_millis(50),
            chart_capacity: 50,
            event_probability: 0.02,
            horizon: TIMELINE_HORIZON,
            tx_pose: PoseChannels::new("tx_azimuth", "tx_elevation"),
            rx_pose: PoseChannels::new("rx_azimuth", "rx_elevation"),
            chart_channels: vec![
                "snr_db".to_string(),
                "ber".to_string(),
                "rx_power_dbm".to_string(),
            ],
            tx_spot: SpotChannels::new("tx_spot_x", "tx_spot_y"),
            rx_spot: SpotChannels::new("rx_spot_x", "rx_spot_y"),
            seed: None,
        }
    }
}

impl PlaybackConfig {
    /// Seeded configuration with telemetry injection disabled
    pub fn deterministic(seed: u64) -> Self {
        PlaybackConfig {
            event_probability: 0.0,
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// The timeline's share of the configuration
    pub fn timeline_config(&self) -> TimelineConfig {
        TimelineConfig {
            event_probability: self.event_probability,
            horizon: self.horizon,
            seed: self.seed,
            ..Default::default()
        }
    }
}
