//! Console configuration from the environment

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use satlink_playback::PlaybackConfig;

pub const ENV_BIND: &str = "SATLINK_BIND";
pub const ENV_SAVE_PATH: &str = "SATLINK_SAVE_PATH";
pub const ENV_STATIC_ROOT: &str = "SATLINK_STATIC_ROOT";
pub const ENV_SAMPLES: &str = "SATLINK_SAMPLES";
pub const ENV_TICK: &str = "SATLINK_TICK";
pub const ENV_PANELS: &str = "SATLINK_PANELS";
pub const ENV_LOG_JSON: &str = "SATLINK_LOG_JSON";
pub const ENV_HEADLESS_SCENE: &str = "SATLINK_HEADLESS_SCENE";

/// Console configuration
#[derive(Clone, Debug)]
pub struct ConsoleConfig {
    /// Address of the configuration-export endpoint
    pub bind: SocketAddr,
    /// CSV written by the save endpoint
    pub save_path: PathBuf,
    /// Directory holding `index.html` and `components/`
    pub static_root: PathBuf,
    /// Sample feed loaded at startup
    pub samples: Option<PathBuf>,
    pub tick_interval: Duration,
    /// Panels that must be complete before the run can start
    pub required_panels: Vec<String>,
    pub log_json: bool,
    /// Report the 3D scene as absent
    pub headless_scene: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            save_path: PathBuf::from("SwapDatas").join("InputDatas.csv"),
            static_root: PathBuf::from("."),
            samples: None,
            tick_interval: Duration::from_millis(100),
            required_panels: ["orbit", "terminal", "channel", "simulation"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            log_json: false,
            headless_scene: false,
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Invalid values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConsoleConfig::default();

        if let Some(bind) = lookup(ENV_BIND) {
            match bind.parse() {
                Ok(addr) => config.bind = addr,
                Err(e) => tracing::warn!(%bind, error = %e, "invalid {}, using default", ENV_BIND),
            }
        }

        if let Some(path) = lookup(ENV_SAVE_PATH).filter(|p| !p.is_empty()) {
            config.save_path = PathBuf::from(path);
        }

        if let Some(root) = lookup(ENV_STATIC_ROOT).filter(|p| !p.is_empty()) {
            config.static_root = PathBuf::from(root);
        }

        config.samples = lookup(ENV_SAMPLES)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        if let Some(tick) = lookup(ENV_TICK) {
            match humantime::parse_duration(&tick) {
                Ok(d) if !d.is_zero() => config.tick_interval = d,
                Ok(_) => tracing::warn!("{} must be non-zero, using default", ENV_TICK),
                Err(e) => tracing::warn!(%tick, error = %e, "invalid {}, using default", ENV_TICK),
            }
        }

        if let Some(panels) = lookup(ENV_PANELS) {
            config.required_panels = panels
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
        }

        config.log_json = lookup(ENV_LOG_JSON).map_or(false, |v| is_truthy(&v));
        config.headless_scene = lookup(ENV_HEADLESS_SCENE).map_or(false, |v| is_truthy(&v));

        config
    }

    pub fn playback(&self) -> PlaybackConfig {
        PlaybackConfig {
            tick_interval: self.tick_interval,
            ..Default::default()
        }
    }
}

pub fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
