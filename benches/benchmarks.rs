use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use satchel::{MemoryStorage, PersistentSignal, Signal, StorageArea};
use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize)]
struct Settings {
    theme: String,
    volume: u32,
}

fn signal_read_benchmark(c: &mut Criterion) {
    let signal: Signal<i32> = Signal::new(42);

    c.bench_function("signal_read", |b| {
        b.iter(|| {
            black_box(signal.get());
        });
    });
}

fn signal_write_benchmark(c: &mut Criterion) {
    let signal: Signal<i32> = Signal::new(0);

    c.bench_function("signal_write", |b| {
        let mut i = 0;
        b.iter(|| {
            signal.set(black_box(i));
            i += 1;
        });
    });
}

fn projection_read_benchmark(c: &mut Criterion) {
    let signal: Signal<i32> = Signal::new(5);
    let doubled = signal.project(|n| n * 2, |n: i32| n / 2);

    c.bench_function("projection_read", |b| {
        b.iter(|| {
            black_box(doubled.get());
        });
    });
}

fn persisted_write_benchmark(c: &mut Criterion) {
    let storage = MemoryStorage::new();
    let settings = PersistentSignal::open(
        &storage,
        "bench",
        &Settings {
            theme: "light".to_string(),
            volume: 0,
        },
    )
    .unwrap();

    c.bench_function("persisted_write", |b| {
        let mut i = 0;
        b.iter(|| {
            settings.update(|s| s.volume = black_box(i));
            i += 1;
        });
    });
}

fn storage_dispatch_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage_dispatch");

    for context_count in [1, 10, 100].iter() {
        let storage = MemoryStorage::new();
        let mut stores = Vec::new();

        for _ in 0..*context_count {
            let handle = storage.handle();
            stores.push(
                PersistentSignal::open(
                    &handle,
                    "bench",
                    &Settings {
                        theme: "light".to_string(),
                        volume: 0,
                    },
                )
                .unwrap(),
            );
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(context_count),
            context_count,
            |b, _| {
                let mut i = 0;
                b.iter(|| {
                    storage.set_item("bench", &format!(r#"{{"theme":"light","volume":{i}}}"#));
                    i += 1;
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    signal_read_benchmark,
    signal_write_benchmark,
    projection_read_benchmark,
    persisted_write_benchmark,
    storage_dispatch_benchmark,
);
criterion_main!(benches);
