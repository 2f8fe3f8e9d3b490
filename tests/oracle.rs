//! Randomized decision sequences, checked against a brute-force
//! model of the sliding window log.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratelimit_window::clock::FakeRelativeClock;
use ratelimit_window::DirectRateLimiter;
use std::time::Duration;

/// Recomputes every decision from the full history of admitted
/// cells.
struct Model {
    window: Duration,
    limit: usize,
    admitted: Vec<Duration>,
    latest: Option<Duration>,
}

impl Model {
    /// `admitted` is ordered, as every decision happens no earlier
    /// than the one before it.
    fn in_window(&self, now: Duration) -> usize {
        self.admitted
            .iter()
            .rev()
            .take_while(|t| now - **t <= self.window)
            .count()
    }

    fn check_n_at(&mut self, n: usize, at: Duration) -> bool {
        let now = self.latest.map_or(at, |latest| at.max(latest));
        self.latest = Some(now);
        if self.in_window(now) + n <= self.limit {
            self.admitted.extend(std::iter::repeat(now).take(n));
            true
        } else {
            false
        }
    }
}

fn run(seed: u64, reorder: bool) {
    let mut rng = StdRng::seed_from_u64(seed);
    let limit = rng.gen_range(1..8u32);
    let window_ms = rng.gen_range(1..200u64);
    let lim = DirectRateLimiter::<FakeRelativeClock>::from_millis(window_ms, limit).unwrap();
    let mut model = Model {
        window: Duration::from_millis(window_ms),
        limit: limit as usize,
        admitted: vec![],
        latest: None,
    };

    let mut now = 0u64;
    for step in 0..2_000 {
        now += rng.gen_range(0..(window_ms / 2 + 2));
        let at = if reorder && rng.gen_bool(0.2) {
            now.saturating_sub(rng.gen_range(0..window_ms + 1))
        } else {
            now
        };
        let at = Duration::from_millis(at);
        let n = rng.gen_range(0..=limit);

        let expected = model.check_n_at(n as usize, at);
        let actual = lim.check_n_at(n, at).is_ok();
        assert_eq!(
            expected, actual,
            "seed {} step {}: {} cells at {:?} (limit {}, window {}ms)",
            seed, step, n, at, limit, window_ms
        );

        if let Some(latest) = model.latest {
            assert!(model.in_window(latest) <= model.limit, "seed {}", seed);
        }
        assert!(lim.count() <= limit as usize);
    }
}

#[test]
fn matches_model_in_order() {
    for seed in 0..50 {
        run(seed, false);
    }
}

#[test]
fn matches_model_with_reordered_time_stamps() {
    for seed in 1000..1050 {
        run(seed, true);
    }
}
