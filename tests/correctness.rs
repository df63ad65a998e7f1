//! Correctness and invariant tests for percentile-window
//!
//! These tests drive the estimators with seeded random streams and check the
//! properties that must always hold: bounded size, sortedness, FIFO eviction
//! and accuracy against an exact sort of the same samples. They complement
//! the unit tests in each module.
//!
//! Run with: cargo test --test correctness

use percentile_window::traits::{PercentileSketch, Sketch};
use percentile_window::{PercentileSet, PercentileWindow};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, LogNormal, Uniform};

fn uniform(rng: &mut StdRng, n: usize, scale: f64) -> Vec<f64> {
    let dist = Uniform::new(0.0, scale);
    (0..n).map(|_| dist.sample(rng)).collect()
}

fn log_normal(rng: &mut StdRng, n: usize, scale: f64) -> Vec<f64> {
    let dist = LogNormal::new(0.0, 1.0).unwrap();
    (0..n).map(|_| dist.sample(rng) * scale).collect()
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

// ============================================================================
// Accuracy
// ============================================================================

mod accuracy {
    use super::*;

    /// Feed every sample into a window large enough to hold them all and
    /// compare against the exact rank in the full sorted set.
    fn check_slice(numbers: &[f64], percentile: f64) {
        let mut p = PercentileWindow::with_window(percentile, numbers.len());
        for &v in numbers {
            p.add(v);
        }

        let numbers = sorted(numbers);
        let got = p.value().unwrap();
        let index = (numbers.len() as f64 * percentile).round() as usize;

        assert!(
            got == numbers[index] || got == numbers[index - 1] || got == numbers[index + 1],
            "percentile {} incorrect\n  actual: {}\nexpected: {}, {}, {}",
            percentile,
            got,
            numbers[index - 1],
            numbers[index],
            numbers[index + 1]
        );
    }

    #[test]
    fn uniform_unit_scale() {
        let mut rng = StdRng::seed_from_u64(1);
        check_slice(&uniform(&mut rng, 10_000, 1.0), 0.5);
        check_slice(&uniform(&mut rng, 10_000, 1.0), 0.9);
    }

    #[test]
    fn uniform_large_scale() {
        let mut rng = StdRng::seed_from_u64(2);
        check_slice(&uniform(&mut rng, 10_000, 10_000.0), 0.5);
        check_slice(&uniform(&mut rng, 10_000, 10_000.0), 0.9);
    }

    #[test]
    fn log_normal_samples() {
        let mut rng = StdRng::seed_from_u64(3);
        check_slice(&log_normal(&mut rng, 10_000, 1.0), 0.5);
        check_slice(&log_normal(&mut rng, 10_000, 1.0), 0.9);
    }

    #[test]
    fn median_within_one_neighbor_of_true_median() {
        let mut rng = StdRng::seed_from_u64(4);
        let numbers = uniform(&mut rng, 10_000, 1.0);

        let mut p = PercentileWindow::with_window(0.5, 10_000);
        for &v in &numbers {
            p.add(v);
        }
        assert!(p.is_full());

        let numbers = sorted(&numbers);
        let got = p.value().unwrap();
        let pos = numbers.iter().position(|&v| v == got).unwrap();
        let index = (numbers.len() as f64 * 0.5).round() as usize;
        assert!(
            pos.abs_diff(index) <= 1,
            "median at sorted position {}, expected within one of {}",
            pos,
            index
        );
    }

    /// At steady state the estimate is exact for the last `W` samples.
    #[test]
    fn steady_state_matches_recent_samples() {
        let mut rng = StdRng::seed_from_u64(5);
        let numbers = log_normal(&mut rng, 5_000, 100.0);
        let capacity = 256;

        let mut p = PercentileWindow::with_window(0.9, capacity);
        for &v in &numbers {
            p.add(v);
        }

        let recent = sorted(&numbers[numbers.len() - capacity..]);
        let index = (capacity as f64 * 0.9).round() as usize;
        assert_eq!(p.value(), Some(recent[index]));
    }
}

// ============================================================================
// Window invariants
// ============================================================================

mod window {
    use super::*;

    #[test]
    fn size_bounded_and_sorted_after_every_add() {
        let mut rng = StdRng::seed_from_u64(10);
        let numbers = uniform(&mut rng, 2_000, 50.0);

        for capacity in [1, 2, 7, 64, 128, 3_000] {
            let mut p = PercentileWindow::with_window(0.5, capacity);
            for &v in &numbers {
                p.add(v);
                assert!(p.len() <= capacity, "capacity {} exceeded", capacity);
                assert!(
                    p.window().windows(2).all(|w| w[0] <= w[1]),
                    "capacity {}: window not sorted",
                    capacity
                );
            }
            assert_eq!(p.len(), capacity.min(numbers.len()));
        }
    }

    #[test]
    fn holds_exactly_last_samples() {
        let mut rng = StdRng::seed_from_u64(11);
        let numbers = uniform(&mut rng, 1_000, 1.0);

        let mut p = PercentileWindow::with_window(0.9, 128);
        for &v in &numbers {
            p.add(v);
        }

        let expected = sorted(&numbers[numbers.len() - 128..]);
        assert_eq!(p.window(), expected.as_slice());
        assert_eq!(p.items_seen(), 1_000);
    }

    #[test]
    fn fifo_eviction_after_filling() {
        let mut rng = StdRng::seed_from_u64(12);
        let capacity = 100;
        let numbers = uniform(&mut rng, 2 * capacity, 1.0);

        let mut p = PercentileWindow::with_window(0.5, capacity);
        for &v in &numbers[..capacity] {
            p.add(v);
        }
        assert!(p.is_full());

        for n in 1..=capacity {
            p.add(numbers[capacity + n - 1]);
            let expected = sorted(&numbers[n..capacity + n]);
            assert_eq!(p.window(), expected.as_slice(), "after {} evictions", n);
        }
    }

    #[test]
    fn heavy_duplicates() {
        let mut rng = StdRng::seed_from_u64(13);
        let dist = Uniform::new(0u32, 4);
        let numbers: Vec<f64> = (0..1_000).map(|_| dist.sample(&mut rng) as f64).collect();

        let mut p = PercentileWindow::with_window(0.5, 50);
        for (i, &v) in numbers.iter().enumerate() {
            p.add(v);
            let start = (i + 1).saturating_sub(50);
            assert_eq!(p.window(), sorted(&numbers[start..=i]).as_slice());
        }
    }

    #[test]
    fn memory_fixed_at_construction() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut p = PercentileWindow::with_window(0.99, 512);
        let before = p.size_bytes();
        for v in uniform(&mut rng, 100_000, 1.0) {
            p.update(&v);
        }
        assert_eq!(p.size_bytes(), before);
    }
}

// ============================================================================
// Queries
// ============================================================================

mod queries {
    use super::*;

    #[test]
    fn deterministic_for_identical_input() {
        let numbers = {
            let mut rng = StdRng::seed_from_u64(20);
            log_normal(&mut rng, 3_000, 10.0)
        };

        let mut a = PercentileWindow::with_window(0.9, 256);
        let mut b = PercentileWindow::with_window(0.9, 256);
        for &v in &numbers {
            a.add(v);
            b.add(v);
            assert_eq!(
                a.value().map(f64::to_bits),
                b.value().map(f64::to_bits)
            );
        }
    }

    #[test]
    fn repeated_value_calls_are_consistent() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut p = PercentileWindow::with_window(0.5, 64);
        for v in uniform(&mut rng, 200, 1.0) {
            p.add(v);
        }

        let first = p.value().unwrap();
        for _ in 0..100 {
            assert_eq!(p.value().unwrap().to_bits(), first.to_bits());
        }
        assert_eq!(p.count(), 200);
    }

    #[test]
    fn empty_returns_none() {
        let p = PercentileWindow::new(0.5);
        assert!(p.value().is_none());
        assert!(p.is_empty());

        let set = PercentileSet::new(&[0.5, 0.9]);
        assert!(set.value(0.5).is_none());
    }

    #[test]
    fn invalid_parameters_rejected() {
        assert!(PercentileWindow::try_new(0.0).is_err());
        assert!(PercentileWindow::try_new(1.0001).is_err());
        assert!(PercentileWindow::try_new(-0.5).is_err());
        assert!(PercentileWindow::try_with_window(0.5, 0).is_err());
        assert!(PercentileWindow::try_new(1.0).is_ok());
    }

    #[test]
    fn generic_over_percentile_sketch() {
        fn p_estimate<S: PercentileSketch>(sketch: &mut S, samples: &[f64]) -> Option<f64> {
            for &v in samples {
                sketch.add(v);
            }
            sketch.value()
        }

        let mut rng = StdRng::seed_from_u64(22);
        let numbers = uniform(&mut rng, 500, 1.0);
        let mut p = PercentileWindow::with_window(0.9, 500);
        let got = p_estimate(&mut p, &numbers).unwrap();

        let numbers = sorted(&numbers);
        assert_eq!(got, numbers[450]);
    }
}

// ============================================================================
// PercentileSet
// ============================================================================

mod set {
    use super::*;

    #[test]
    fn matches_independent_windows() {
        let mut rng = StdRng::seed_from_u64(30);
        let numbers = log_normal(&mut rng, 2_000, 1.0);
        let percentiles = [0.5, 0.9, 0.95, 0.99];

        let mut set = PercentileSet::with_window(&percentiles, 300);
        let mut singles: Vec<PercentileWindow> = percentiles
            .iter()
            .map(|&p| PercentileWindow::with_window(p, 300))
            .collect();

        for &v in &numbers {
            set.add(v);
            for single in &mut singles {
                single.add(v);
            }
        }

        for single in &singles {
            assert_eq!(set.value(single.percentile()), single.value());
        }
        assert_eq!(set.count(), 2_000);
    }
}
