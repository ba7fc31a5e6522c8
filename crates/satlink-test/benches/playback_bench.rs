//! Benchmarks for SATLINK playback operations

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use satlink_core::{SimTime, TimelineEvent};
use satlink_playback::{NullSink, PlaybackConfig, PlaybackDriver, SampleTable};
use satlink_test::synthetic_feed;
use satlink_time::{ClockState, ManualTimeSource};
use satlink_timeline::{TimelineConfig, TimelineStore};

fn feed_table() -> SampleTable {
    let text = synthetic_feed(Duration::from_secs(100), Duration::from_millis(10), 1);
    SampleTable::parse(&text).expect("synthetic feed parses")
}

fn bench_nearest_lookup(c: &mut Criterion) {
    let table = feed_table();
    let tolerance = Duration::from_millis(50);

    c.bench_function("sample_nearest", |b| {
        let mut t = 0u64;
        b.iter(|| {
            t = (t + 7_919) % 100_000_000;
            black_box(table.nearest(black_box(SimTime::from_micros(t)), tolerance).is_some())
        })
    });
}

fn bench_driver_tick(c: &mut Criterion) {
    let wall = ManualTimeSource::new();
    let mut driver = PlaybackDriver::with_source(PlaybackConfig::deterministic(1), wall.clone());
    driver.samples().install(feed_table());
    driver.start();

    c.bench_function("driver_tick", |b| {
        b.iter(|| {
            wall.advance(Duration::from_millis(100));
            black_box(driver.tick(&mut NullSink).frame_matched)
        })
    });
}

fn bench_visible_up_to(c: &mut Criterion) {
    let mut store = TimelineStore::with_config(TimelineConfig {
        seed: Some(1),
        ..Default::default()
    });
    for i in 0..5_000u64 {
        store.append(TimelineEvent::telemetry(SimTime::from_millis(i * 20), "x"));
    }

    c.bench_function("visible_up_to", |b| {
        b.iter(|| black_box(store.visible_up_to(black_box(SimTime::from_secs(50))).count()))
    });
}

fn bench_inject_random_event(c: &mut Criterion) {
    let mut store = TimelineStore::with_config(TimelineConfig {
        seed: Some(1),
        ..Default::default()
    });

    c.bench_function("inject_random_event", |b| {
        b.iter(|| {
            black_box(
                store
                    .inject_random_event(ClockState::Running, SimTime::from_secs(1))
                    .is_some(),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_nearest_lookup,
    bench_driver_tick,
    bench_visible_up_to,
    bench_inject_random_event,
);
criterion_main!(benches);
