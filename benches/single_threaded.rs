use std::time::{Duration, Instant};

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use nonzero_ext::nonzero;
use ratelimit_window::clock::MonotonicClock;
use ratelimit_window::DirectRateLimiter;

pub fn bench_all(c: &mut Criterion) {
    bench_direct(c);
    bench_direct_multi(c);
}

fn bench_direct(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_threaded/direct");
    group.throughput(Throughput::Elements(1));
    for limit in [10u32, 1_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(limit), limit, |b, &limit| {
            let rl = DirectRateLimiter::<MonotonicClock>::build_with_capacity(
                std::num::NonZeroU32::new(limit).unwrap(),
            )
            .per(Duration::from_secs(1))
            .build()
            .unwrap();
            let now = Instant::now();
            let step = Duration::from_micros(20);
            let mut i = 0;
            b.iter(|| {
                i += 1;
                black_box(rl.check_at(now + (step * i)).is_ok());
            });
        });
    }
    group.finish();
}

fn bench_direct_multi(c: &mut Criterion) {
    let elements: u32 = 10;
    let mut group = c.benchmark_group("single_threaded/direct_multi");
    group.throughput(Throughput::Elements(elements as u64));
    group.bench_function("10", |b| {
        let rl = DirectRateLimiter::<MonotonicClock>::per_second(nonzero!(1_000u32));
        let now = Instant::now();
        let ms = Duration::from_millis(20);
        let mut i = 0;
        b.iter(|| {
            i += 1;
            black_box(rl.check_n_at(elements, now + (ms * i)).is_ok());
        });
    });
    group.finish();
}
