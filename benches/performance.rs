//! Performance benchmarks for multicf
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use geo::{Coord, Rect};
use multicf::{Config, Portal, Quadtree, build_forest};

/// Generate a reproducible irregular portal cloud around London
fn generate_portals(n: u32) -> Vec<Portal> {
    (0..n)
        .map(|i| {
            let lat = 51.5 + ((i as f64 * 53.0) % 13.0) * 0.001 + i as f64 * 1e-5;
            let lon = -0.1 + ((i as f64 * 37.0) % 11.0) * 0.001 + i as f64 * 7e-6;
            Portal::new(i, format!("portal-{i}"), lat, lon)
        })
        .collect()
}

fn bench_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree");

    for &n in &[1_000u32, 10_000, 50_000] {
        let portals = generate_portals(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("build", n), &portals, |b, portals| {
            b.iter(|| Quadtree::build(portals));
        });
    }

    let portals = generate_portals(50_000);
    let tree = Quadtree::build(&portals);
    let query = Rect::new(
        Coord { x: -0.098, y: 51.502 },
        Coord { x: -0.094, y: 51.506 },
    );
    group.bench_function("range_query_50k", |b| {
        b.iter(|| tree.range_query(query));
    });

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for &n in &[12u32, 16, 20] {
        let portals = generate_portals(n);
        group.bench_with_input(BenchmarkId::new("build_forest", n), &portals, |b, portals| {
            b.iter(|| build_forest(portals, &Config { max_depth: 3 }).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_index, bench_search);
criterion_main!(benches);
