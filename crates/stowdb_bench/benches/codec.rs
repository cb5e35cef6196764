//! Collection codec benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use stowdb_bench::{generate_items, Item};
use stowdb_codec::{CborCodec, Codec, JsonCodec};

fn bench_encode<C: Codec>(c: &mut Criterion, codec: C) {
    let mut group = c.benchmark_group(format!("encode_{}", codec.name()));

    for count in [10, 100, 1000].iter() {
        let items = generate_items(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &items, |b, items| {
            b.iter(|| {
                let bytes = codec.encode(black_box(items)).unwrap();
                black_box(bytes);
            });
        });
    }

    group.finish();
}

fn bench_decode<C: Codec>(c: &mut Criterion, codec: C) {
    let mut group = c.benchmark_group(format!("decode_{}", codec.name()));

    for count in [10, 100, 1000].iter() {
        let bytes = codec.encode(&generate_items(*count)).unwrap();
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &bytes, |b, bytes| {
            b.iter(|| {
                let items: Vec<Item> = codec.decode(black_box(bytes)).unwrap();
                black_box(items);
            });
        });
    }

    group.finish();
}

/// Benchmark the per-record operations the store relies on.
fn bench_record_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_ops");
    let item = generate_items(1).remove(0);

    group.bench_function("json_represent", |b| {
        b.iter(|| black_box(JsonCodec.represent(black_box(&item)).unwrap()));
    });
    group.bench_function("json_deep_clone", |b| {
        b.iter(|| black_box(JsonCodec.deep_clone(black_box(&item)).unwrap()));
    });
    group.bench_function("cbor_represent", |b| {
        b.iter(|| black_box(CborCodec.represent(black_box(&item)).unwrap()));
    });
    group.bench_function("cbor_deep_clone", |b| {
        b.iter(|| black_box(CborCodec.deep_clone(black_box(&item)).unwrap()));
    });

    group.finish();
}

fn bench_codecs(c: &mut Criterion) {
    bench_encode(c, JsonCodec);
    bench_encode(c, CborCodec);
    bench_decode(c, JsonCodec);
    bench_decode(c, CborCodec);
}

criterion_group!(benches, bench_codecs, bench_record_ops);
criterion_main!(benches);
