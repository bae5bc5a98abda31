use chesslife_core::prelude::*;
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_tick");

    for &stones in &[10usize, 100, 1000] {
        group.bench_function(format!("stones_{}", stones), |b| {
            let mut engine = Engine::new(WorldConfig {
                stone_count: stones,
                seed: Some(7),
                ..Default::default()
            });
            b.iter(|| engine.tick());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
