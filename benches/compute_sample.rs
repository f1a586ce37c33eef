//! Metric derivation benchmark
//!
//! Measures `compute_sample` over realistic multi-zone inputs. The
//! derivation runs once per sampling tick, so it should stay far below
//! the one-second default interval.

use std::time::SystemTime;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use fragwatch::{compute_sample, ZoneHistogram, MAX_ORDER};

fn make_zones(nodes: u32) -> Vec<ZoneHistogram> {
    let mut zones = Vec::new();
    for node in 0..nodes {
        for name in ["DMA", "DMA32", "Normal"] {
            let mut nr_free = [0u64; MAX_ORDER];
            for (order, count) in nr_free.iter_mut().enumerate() {
                *count = 1000 >> order;
            }
            zones.push(ZoneHistogram::new(node, name, nr_free));
        }
    }
    zones
}

fn bench_compute_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_sample");

    for nodes in [1u32, 4, 16] {
        let zones = make_zones(nodes);
        group.bench_with_input(BenchmarkId::new("all_zones", nodes), &zones, |b, zones| {
            b.iter(|| compute_sample(black_box(zones), None, SystemTime::now()));
        });
        group.bench_with_input(
            BenchmarkId::new("normal_only", nodes),
            &zones,
            |b, zones| {
                b.iter(|| compute_sample(black_box(zones), Some("Normal"), SystemTime::now()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_compute_sample);
criterion_main!(benches);
