//! SATLINK Console - Headless operator console
//!
//! Runs the playback loop against a tracing sink, serves the configuration
//! save endpoint and reads operator commands from stdin.

mod commands;
mod config;
mod console;
mod export;
mod logging;
mod panels;
mod server;
mod sink;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use satlink_playback::{run_playback, spawn_loader, PlaybackDriver, SampleSlot};

use crate::config::{is_truthy, ConsoleConfig, ENV_LOG_JSON};
use crate::console::{run_input, Console};
use crate::panels::PanelReadiness;
use crate::server::{prepare_save_dir, SaveState};
use crate::sink::TracingSink;

const COMMAND_QUEUE: usize = 64;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging comes up before the rest of the config so parse warnings are visible
    let log_json = std::env::var(ENV_LOG_JSON).map_or(false, |v| is_truthy(&v));
    logging::init_logging(log_json);

    let config = ConsoleConfig::from_env();
    tracing::info!(
        bind = %config.bind,
        save_path = %config.save_path.display(),
        samples = ?config.samples,
        tick = %humantime::format_duration(config.tick_interval),
        panels = ?config.required_panels,
        log_json = config.log_json,
        "console configured"
    );

    prepare_save_dir(&config.save_path).await?;
    let listener = TcpListener::bind(config.bind).await?;
    let save_state = SaveState::new(config.save_path.clone());
    let static_root = config.static_root.clone();
    tokio::spawn(async move {
        if let Err(e) = server::serve(listener, save_state, static_root).await {
            tracing::error!(error = %e, "configuration server stopped");
        }
    });

    let samples = SampleSlot::new();
    if let Some(path) = config.samples.clone() {
        spawn_loader(path, samples.clone());
    }

    let mut driver = PlaybackDriver::new(config.playback()).with_samples(samples);
    let mut sink = if config.headless_scene {
        TracingSink::headless_scene()
    } else {
        TracingSink::new()
    };

    let (tx, rx) = mpsc::channel(COMMAND_QUEUE);
    let console = Console::new(
        PanelReadiness::new(config.required_panels.clone()),
        config.save_path.clone(),
        tx,
    );
    println!("{}", commands::HELP);
    let input = tokio::spawn(run_input(console, tokio::io::stdin()));

    run_playback(&mut driver, &mut sink, rx).await;
    input.await??;

    tracing::info!(
        ticks = driver.stats().ticks,
        events = driver.timeline().len(),
        markers = driver.timeline().markers().len(),
        "console exited"
    );
    Ok(())
}
