use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use huffproc_core::{compress, decompress_bytes, frequency::FrequencyTable, tree::HuffTree};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SIZES: &[usize] = &[8192, 65536, 1_048_576];

/// Text-like data: a skewed draw over printable ASCII.
fn skewed_data(size: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    (0..size)
        .map(|_| {
            let r: f64 = rng.gen();
            b' ' + ((r * r) * 95.0) as u8
        })
        .collect()
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    for &size in SIZES {
        let data = skewed_data(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            let mut out = Vec::with_capacity(data.len());
            b.iter(|| {
                out.clear();
                compress(Cursor::new(black_box(data)), &mut out).unwrap()
            });
        });
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress");
    for &size in SIZES {
        let mut compressed = Vec::new();
        compress(Cursor::new(skewed_data(size)), &mut compressed).unwrap();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &compressed, |b, compressed| {
            b.iter(|| decompress_bytes(black_box(compressed)).unwrap());
        });
    }
    group.finish();
}

fn bench_tree_build(c: &mut Criterion) {
    let data = skewed_data(65536);
    let freqs = FrequencyTable::from_bytes(&data);
    c.bench_function("tree_build", |b| {
        b.iter(|| HuffTree::from_frequencies(black_box(&freqs)).unwrap());
    });
}

criterion_group!(benches, bench_compress, bench_decompress, bench_tree_build);
criterion_main!(benches);
