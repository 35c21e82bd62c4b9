use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gmsuite::sm3::sm3;

fn bench_sm3(c: &mut Criterion) {
    let data = vec![0x5au8; 4096];
    c.bench_function("sm3 4096 bytes", |b| b.iter(|| sm3(black_box(&data))));
}

criterion_group!(benches, bench_sm3);
criterion_main!(benches);
