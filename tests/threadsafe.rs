#![cfg(feature = "sync")]

use nonzero_ext::nonzero;
use ratelimit_window::clock::{FakeRelativeClock, MonotonicClock};
use ratelimit_window::DirectRateLimiter;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn actual_threadsafety() {
    let lim = DirectRateLimiter::<MonotonicClock>::per_second(nonzero!(20u32));
    let now = Instant::now();
    let ms = Duration::from_millis(1);
    let mut children = vec![];

    lim.check_at(now).unwrap();
    for _i in 0..19 {
        let lim = lim.clone();
        children.push(thread::spawn(move || lim.check_at(now).is_ok()));
    }
    for child in children {
        assert!(child.join().unwrap());
    }
    assert!(!lim.check_at(now + ms * 2).is_ok());
    assert_eq!(Ok(()), lim.check_at(now + ms * 1001));
}

#[test]
fn clones_share_state_across_threads() {
    let lim: DirectRateLimiter = DirectRateLimiter::per_second(nonzero!(50u32));
    let thread_lim = lim.clone();
    thread::spawn(move || assert_eq!(Ok(()), thread_lim.check()))
        .join()
        .unwrap();
    assert_eq!(Ok(()), lim.check());
    assert_eq!(2, lim.count());
}

#[test]
fn exactly_limit_cells_admitted_at_one_instant() {
    const THREADS: usize = 64;
    const LIMIT: usize = 17;
    let lim = DirectRateLimiter::<FakeRelativeClock>::from_millis(60_000, LIMIT as u32).unwrap();
    let now = Duration::from_millis(1234);
    let barrier = Arc::new(Barrier::new(THREADS));
    let children: Vec<_> = (0..THREADS)
        .map(|_| {
            let lim = lim.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                lim.check_at(now).is_ok()
            })
        })
        .collect();
    let admitted = children
        .into_iter()
        .map(|child| child.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(LIMIT, admitted);
    assert_eq!(LIMIT, lim.count());
}

#[test]
fn concurrent_batches_never_overshoot() {
    const THREADS: usize = 16;
    let lim = DirectRateLimiter::<FakeRelativeClock>::from_millis(1000, 10).unwrap();
    let barrier = Arc::new(Barrier::new(THREADS));
    let children: Vec<_> = (0..THREADS)
        .map(|_| {
            let lim = lim.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let mut admitted = 0;
                for step in 0..200u64 {
                    // every thread walks through the same 20ms steps, so
                    // time stamps interleave out of order across threads.
                    if lim.check_n_at(3, Duration::from_millis(step * 20)).is_ok() {
                        admitted += 3;
                    }
                    assert!(lim.count() <= 10);
                }
                admitted
            })
        })
        .collect();
    let admitted: u64 = children.into_iter().map(|c| c.join().unwrap()).sum();
    assert!(admitted > 0);
    assert!(lim.count() <= 10);
}
