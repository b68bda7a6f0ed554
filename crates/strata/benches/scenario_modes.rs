//! # Scenario Mode Benchmark
//!
//! Measures one full tick of the scenario systems over:
//! 1. Chunk storage - typed column views per chunk
//! 2. Boxed storage - one heap object per entity, components by id

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strata::{BoxedScenario, Scenario, ScenarioConfig, ScenarioMode};

const ENTITY_COUNT: usize = 20_000;
const WARMUP_TICKS: usize = 8;

fn config(mode: ScenarioMode) -> ScenarioConfig {
    ScenarioConfig {
        mode,
        max_entities: ENTITY_COUNT,
        fixed_delta_secs: Some(1.0 / 60.0),
        duration_secs: f32::MAX,
        ..ScenarioConfig::default()
    }
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario_tick_20k");

    let mut chunked = Scenario::new(config(ScenarioMode::Chunk)).expect("valid config");
    for _ in 0..WARMUP_TICKS {
        chunked.tick().expect("tick");
    }
    group.bench_function("chunk", |b| {
        b.iter(|| {
            chunked.tick().expect("tick");
            black_box(chunked.engine().total_entities())
        });
    });

    let mut boxed = BoxedScenario::new(config(ScenarioMode::NoChunk)).expect("valid config");
    for _ in 0..WARMUP_TICKS {
        boxed.tick();
    }
    group.bench_function("no_chunk", |b| {
        b.iter(|| {
            boxed.tick();
            black_box(boxed.world().len())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
