//! Statistical tests for weighted sampling.

use timeshape_core::distribution::{
    WeightedDistribution, REFERENCE_DAY_WEIGHTS, REFERENCE_HOUR_WEIGHTS,
};
use timeshape_core::{ConfigError, RngManager};

fn histogram(dist: &WeightedDistribution, seed: u64, draws: usize) -> Vec<usize> {
    let mut rng = RngManager::new(seed);
    let mut counts = vec![0; dist.len()];
    for _ in 0..draws {
        counts[dist.sample(&mut rng)] += 1;
    }
    counts
}

#[test]
fn test_zero_weight_days_never_selected() {
    let days = WeightedDistribution::day_of_week(&REFERENCE_DAY_WEIGHTS).unwrap();
    let counts = histogram(&days, 42, 10_000);

    assert_eq!(counts[5], 0, "Saturday was sampled");
    assert_eq!(counts[6], 0, "Sunday was sampled");
}

#[test]
fn test_zero_weight_hours_never_selected() {
    let hours = WeightedDistribution::hour_of_day(&REFERENCE_HOUR_WEIGHTS).unwrap();
    let counts = histogram(&hours, 7, 20_000);

    for (hour, (&count, &weight)) in counts.iter().zip(REFERENCE_HOUR_WEIGHTS.iter()).enumerate() {
        if weight == 0.0 {
            assert_eq!(count, 0, "hour {} has zero weight but was sampled", hour);
        } else {
            assert!(count > 0, "hour {} has weight {} but was never sampled", hour, weight);
        }
    }
}

#[test]
fn test_zero_weights_between_positive_ones() {
    let dist = WeightedDistribution::new(&[0.0, 5.0, 0.0, 0.0, 1.0, 0.0]).unwrap();
    let counts = histogram(&dist, 1, 10_000);
    assert_eq!(counts[0] + counts[2] + counts[3] + counts[5], 0);
    assert_eq!(counts[1] + counts[4], 10_000);
}

#[test]
fn test_weighted_proportionality() {
    const DRAWS: usize = 100_000;
    let days = WeightedDistribution::day_of_week(&REFERENCE_DAY_WEIGHTS).unwrap();
    let counts = histogram(&days, 12345, DRAWS);
    let total: f64 = REFERENCE_DAY_WEIGHTS.iter().sum();

    for (day, &count) in counts.iter().enumerate() {
        let expected = REFERENCE_DAY_WEIGHTS[day] / total;
        let observed = count as f64 / DRAWS as f64;
        assert!(
            (observed - expected).abs() <= 0.02,
            "day {}: observed {:.4}, expected {:.4}",
            day,
            observed,
            expected
        );
    }
}

#[test]
fn test_single_category_always_selected() {
    let dist = WeightedDistribution::new(&[0.3]).unwrap();
    assert_eq!(histogram(&dist, 9, 1_000), vec![1_000]);
}

#[test]
fn test_sampling_is_pure_in_rng_state() {
    let days = WeightedDistribution::day_of_week(&REFERENCE_DAY_WEIGHTS).unwrap();
    assert_eq!(histogram(&days, 77, 5_000), histogram(&days, 77, 5_000));

    let mut rng = RngManager::new(77);
    let before = rng.clone();
    let first = days.sample(&mut rng);
    let mut replay = before;
    assert_eq!(days.sample(&mut replay), first);
    assert_eq!(replay, rng);
}

#[test]
fn test_day_cardinality_mismatch() {
    let err = WeightedDistribution::day_of_week(&[1.0; 8]).unwrap_err();
    assert_eq!(
        err,
        ConfigError::WrongCardinality {
            name: "day-of-week",
            expected: 7,
            actual: 8,
        }
    );
}

#[test]
fn test_error_message_names_parameter() {
    let err = WeightedDistribution::hour_of_day(&[0.0; 24]).unwrap_err();
    assert_eq!(err.to_string(), "hour-of-day distribution has zero total weight");
}
