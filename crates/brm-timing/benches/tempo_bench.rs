use brm_timing::{Swing, TempoMap};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn dense_map(changes: usize) -> TempoMap {
    let mut map = TempoMap::new();
    for i in 0..changes {
        let bpm = 90.0 + (i % 7) as f64 * 15.0;
        map.add(i as f64 * 4.0, bpm, Swing::Straight).unwrap();
    }
    map
}

fn conversion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tempo_map");

    let map = dense_map(512);
    group.bench_function("beat_at_512", |b| {
        let mut seconds = 0.0;
        b.iter(|| {
            seconds = (seconds + 0.37) % 900.0;
            black_box(map.beat_at(black_box(seconds)));
        });
    });

    group.bench_function("seconds_at_512", |b| {
        let mut beat = 0.0;
        b.iter(|| {
            beat = (beat + 0.61) % 2048.0;
            black_box(map.seconds_at(black_box(beat)));
        });
    });

    group.finish();
}

fn mutation_benchmark(c: &mut Criterion) {
    c.bench_function("tempo_map_insert_front", |b| {
        b.iter(|| {
            let mut map = dense_map(64);
            // forces a full recompute of the cached start times
            map.add(black_box(0.5), 200.0, Swing::Swing).unwrap();
            black_box(map.len());
        });
    });
}

criterion_group!(benches, conversion_benchmark, mutation_benchmark);
criterion_main!(benches);
