use criterion::{criterion_group, criterion_main};


criterion_group!(
    benches,
    multi_threaded::bench_all,
    single_threaded::bench_all
);
criterion_main!(benches);
