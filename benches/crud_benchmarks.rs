use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rb_index::{ConcurrentOrderedMap, LockedMap, RBTree};
use std::collections::BTreeSet;
use std::hint::black_box;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<u64> {
    (0..n as u64).collect()
}

fn random_keys(n: usize) -> Vec<u64> {
    let mut keys = ordered_keys(n);
    keys.shuffle(&mut StdRng::seed_from_u64(12345));
    keys
}

// ─── Tree Benchmarks ────────────────────────────────────────────────────────

fn bench_tree_insert(c: &mut Criterion) {
    for (name, keys) in [("tree_insert_ordered", ordered_keys(N)), ("tree_insert_random", random_keys(N))] {
        let mut group = c.benchmark_group(name);

        group.bench_function(BenchmarkId::new("RBTree", N), |b| {
            b.iter(|| {
                let mut tree = RBTree::new();
                for &key in &keys {
                    tree.insert(key).unwrap();
                }
                tree
            });
        });

        group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
            b.iter(|| {
                let mut set = BTreeSet::new();
                for &key in &keys {
                    set.insert(key);
                }
                set
            });
        });

        group.finish();
    }
}

fn bench_tree_contains(c: &mut Criterion) {
    let keys = random_keys(N);
    let tree: RBTree<u64> = keys.iter().copied().collect();
    let set: BTreeSet<u64> = keys.iter().copied().collect();
    let mut group = c.benchmark_group("tree_contains_random");

    group.bench_function(BenchmarkId::new("RBTree", N), |b| {
        b.iter(|| keys.iter().filter(|key| tree.contains(*key)).count());
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| keys.iter().filter(|key| set.contains(*key)).count());
    });

    group.finish();
}

fn bench_tree_remove(c: &mut Criterion) {
    let keys = random_keys(N);
    let tree: RBTree<u64> = ordered_keys(N).into_iter().collect();
    let set: BTreeSet<u64> = ordered_keys(N).into_iter().collect();
    let mut group = c.benchmark_group("tree_remove_random");

    group.bench_function(BenchmarkId::new("RBTree", N), |b| {
        b.iter_batched(
            || tree.clone(),
            |mut tree| {
                for key in &keys {
                    tree.remove(key).unwrap();
                }
                tree
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter_batched(
            || set.clone(),
            |mut set| {
                for key in &keys {
                    set.remove(key);
                }
                set
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn bench_tree_ascending(c: &mut Criterion) {
    let tree: RBTree<u64> = random_keys(N).into_iter().collect();
    let mut group = c.benchmark_group("tree_ascending");

    for count in [10, 100, N] {
        group.bench_function(BenchmarkId::new("RBTree", count), |b| {
            b.iter(|| tree.ascending(black_box(count)).sum::<u64>());
        });
    }

    group.finish();
}

// ─── Map Benchmarks ─────────────────────────────────────────────────────────

fn bench_map_set(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("map_set_random");

    group.bench_function(BenchmarkId::new("ConcurrentOrderedMap", N), |b| {
        b.iter(|| {
            let map = ConcurrentOrderedMap::with_capacity(N);
            for &key in &keys {
                map.set(key, key);
            }
            map
        });
    });

    group.bench_function(BenchmarkId::new("LockedMap", N), |b| {
        b.iter(|| {
            let map = LockedMap::with_capacity(N);
            for &key in &keys {
                map.set(key, key);
            }
            map
        });
    });

    group.finish();
}

fn bench_map_descending(c: &mut Criterion) {
    let map: ConcurrentOrderedMap<u64, u64> = random_keys(N).into_iter().map(|key| (key, key)).collect();
    let mut group = c.benchmark_group("map_descending");

    for count in [10, 100, N] {
        group.bench_function(BenchmarkId::new("ConcurrentOrderedMap", count), |b| {
            b.iter(|| map.descending(black_box(count)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_tree_insert,
    bench_tree_contains,
    bench_tree_remove,
    bench_tree_ascending,
    bench_map_set,
    bench_map_descending,
);
criterion_main!(benches);
