use autohop::core::codec::{decode_fixed, encode_fixed, encode_minimal};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn benchmark_codec(c: &mut Criterion) {
    c.bench_function("encode_minimal", |b| {
        b.iter(|| encode_minimal(black_box(0x0524_BF4C)));
    });

    c.bench_function("encode_fixed_u32", |b| {
        b.iter(|| encode_fixed(black_box(5), 4));
    });

    let flag_word = 0xFFFF_FFFFu32.to_le_bytes();
    c.bench_function("decode_fixed_u32", |b| {
        b.iter(|| decode_fixed(black_box(&flag_word)));
    });
}

criterion_group!(benches, benchmark_codec);
criterion_main!(benches);
