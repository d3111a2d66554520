//! Lookup latency benchmarks for memory-mapped hash lists.
//!
//! Run with:
//! ```bash
//! cargo bench --bench lookup
//! ```

#![allow(clippy::expect_used)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use leakcheck_core::{BoundaryStrategy, HashList, LookupConfig, LookupKey, LookupSet};
use std::hint::black_box;
use std::io::Write;
use tempfile::NamedTempFile;

/// Write a sorted SHA-1 list with `count` records.
fn create_list(count: usize) -> NamedTempFile {
    let mut keys: Vec<_> = (0..count)
        .map(|i| LookupKey::from_plaintext(format!("bench-{i}")))
        .collect();
    keys.sort();

    let mut file = NamedTempFile::new().expect("Failed to create temporary benchmark list");
    for (i, key) in keys.iter().enumerate() {
        writeln!(file, "{key}:{}", i % 4096).expect("Failed to write benchmark record");
    }
    file.flush().expect("Failed to flush benchmark list");
    file
}

fn bench_single_lookup(c: &mut Criterion) {
    let file = create_list(200_000);
    let hit = LookupKey::from_plaintext("bench-12345");
    let miss = LookupKey::from_plaintext("not-in-list");

    let mut group = c.benchmark_group("single_lookup");
    for boundary in [BoundaryStrategy::PrecedingNewline, BoundaryStrategy::KeyWidth] {
        let config = LookupConfig::default().with_boundary(boundary);
        let list = HashList::open(file.path(), config).expect("Failed to open benchmark list");

        group.bench_with_input(BenchmarkId::new("hit", format!("{boundary:?}")), &hit, |b, key| {
            b.iter(|| list.get(black_box(key)).expect("lookup failed"));
        });
        group.bench_with_input(BenchmarkId::new("miss", format!("{boundary:?}")), &miss, |b, key| {
            b.iter(|| list.get(black_box(key)).expect("lookup failed"));
        });
    }
    group.finish();
}

fn bench_batch_lookup(c: &mut Criterion) {
    let file = create_list(200_000);
    let list =
        HashList::open(file.path(), LookupConfig::default()).expect("Failed to open benchmark list");

    let mut group = c.benchmark_group("batch_lookup");
    for size in [10usize, 100, 1000] {
        let set = LookupSet::from_plaintexts((0..size).map(|i| format!("bench-{}", i * 97)));
        group.bench_with_input(BenchmarkId::from_parameter(size), &set, |b, set| {
            b.iter(|| list.lookup(black_box(set)).expect("lookup failed"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_lookup, bench_batch_lookup);
criterion_main!(benches);
