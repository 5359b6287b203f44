//! Criterion micro-benchmarks for hierarchical bitset mutation and sparse
//! enumeration.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use warren::bitset::HierarchicalBitSet;

const LEN: usize = 1 << 20;

fn sparse_indices(count: usize) -> Vec<usize> {
    (0..count).map(|i| (i * 7919) % LEN).collect()
}

fn bench_set_reset_10k(c: &mut Criterion) {
    let bits = HierarchicalBitSet::new(LEN).unwrap();
    let indices = sparse_indices(10_000);

    c.bench_function("bitset_set_reset_10k", |b| {
        b.iter(|| {
            for &i in &indices {
                black_box(bits.set(i));
            }
            for &i in &indices {
                black_box(bits.reset(i));
            }
        });
    });
}

fn bench_iterate_sparse(c: &mut Criterion) {
    let bits = HierarchicalBitSet::new(LEN).unwrap();
    for i in sparse_indices(1_000) {
        bits.set(i);
    }
    let mut scratch = [0u32; 256];

    c.bench_function("bitset_iterate_1k_of_1m", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            bits.indices_batched(&mut scratch, |batch| {
                sum += batch.iter().map(|&i| u64::from(i)).sum::<u64>();
            });
            black_box(sum);
        });
    });
}

fn bench_count_dense(c: &mut Criterion) {
    let bits = HierarchicalBitSet::new(LEN).unwrap();
    for i in (0..LEN).step_by(3) {
        bits.set(i);
    }

    c.bench_function("bitset_count_dense_1m", |b| {
        b.iter(|| black_box(bits.count()));
    });
}

criterion_group!(
    benches,
    bench_set_reset_10k,
    bench_iterate_sparse,
    bench_count_dense
);
criterion_main!(benches);
