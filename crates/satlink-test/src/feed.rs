//! Synthetic sample feeds for tests and benchmarks

use std::fmt::Write;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Header matching the default playback channel names
pub const FEED_HEADER: &str = "time,tx_azimuth,tx_elevation,rx_azimuth,rx_elevation,\
snr_db,ber,rx_power_dbm,tx_spot_x,tx_spot_y,rx_spot_x,rx_spot_y";

/// Build a comma-delimited feed covering `[0, span]` every `step`
pub fn synthetic_feed(span: Duration, step: Duration, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = String::from(FEED_HEADER);
    out.push('\n');

    let step_us = step.as_micros().max(1);
    let rows = span.as_micros() / step_us;
    for i in 0..=rows {
        let t = (i * step_us) as f64 / 1_000_000.0;
        let _ = writeln!(
            out,
            "{:.3},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2e},{:.1},{:.3},{:.3},{:.3},{:.3}",
            t,
            (t * 3.6) % 360.0,
            30.0 + 10.0 * (t * 0.1).sin(),
            (180.0 + t * 3.6) % 360.0,
            35.0 + 8.0 * (t * 0.1).cos(),
            12.0 + rng.gen_range(-1.5..1.5f64),
            10f64.powf(rng.gen_range(-9.0..-5.0f64)),
            -95.0 + rng.gen_range(-3.0..3.0f64),
            rng.gen_range(-1.0..1.0f64),
            rng.gen_range(-1.0..1.0f64),
            rng.gen_range(-1.0..1.0f64),
            rng.gen_range(-1.0..1.0f64),
        );
    }
    out
}
