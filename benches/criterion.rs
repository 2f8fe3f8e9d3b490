use criterion::{criterion_group, criterion_main};

mod single_threaded;

criterion_group!(
    benches,
    multi_threaded::bench_all,
    single_threaded::bench_all
);
criterion_main!(benches);
