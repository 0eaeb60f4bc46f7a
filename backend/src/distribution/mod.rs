//! Discrete weighted sampling over small fixed category sets.
//!
//! A [`WeightedDistribution`] stores a cumulative-weight table. Sampling
//! draws `u ∈ [0, total)` and binary-searches for the first category whose
//! cumulative weight exceeds `u`. A zero-weight category has the same
//! cumulative value as its predecessor, so no draw can ever land on it.
//!
//! # Example
//!
//! ```
//! use timeshape_core::distribution::{WeightedDistribution, REFERENCE_DAY_WEIGHTS};
//! use timeshape_core::RngManager;
//!
//! let days = WeightedDistribution::day_of_week(&REFERENCE_DAY_WEIGHTS).unwrap();
//! let mut rng = RngManager::new(42);
//! let day = days.sample(&mut rng);
//! assert!(day < 5); // weekend weights are zero
//! ```

use crate::error::ConfigError;
use crate::rng::RngManager;

pub const DAYS_PER_WEEK: usize = 7;
pub const HOURS_PER_DAY: usize = 24;

/// Day-of-week weights (Monday first): busy midweek, empty weekend.
pub const REFERENCE_DAY_WEIGHTS: [f64; DAYS_PER_WEEK] = [1.0, 2.0, 3.0, 2.0, 1.0, 0.0, 0.0];

/// Hour-of-day weights: nothing overnight, peaks mid-morning and late afternoon.
pub const REFERENCE_HOUR_WEIGHTS: [f64; HOURS_PER_DAY] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, // 00-07
    1.0, 3.0, 3.0, 2.0, 1.0, 1.0, 3.0, 4.0, // 08-15
    3.0, 2.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, // 16-23
];

/// Weighted choice over category indices `0..len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedDistribution {
    name: &'static str,
    weights: Vec<f64>,
    /// `cumulative[i]` = sum of `weights[..=i]`
    cumulative: Vec<f64>,
    /// Fallback when `u * total` rounds up to `total`
    last_positive: usize,
}

impl WeightedDistribution {
    /// Build a distribution of any cardinality.
    pub fn new(weights: &[f64]) -> Result<Self, ConfigError> {
        Self::build("weighted", weights)
    }

    /// Build a distribution that must have exactly `expected` categories.
    pub fn with_cardinality(
        name: &'static str,
        weights: &[f64],
        expected: usize,
    ) -> Result<Self, ConfigError> {
        if weights.len() != expected {
            return Err(ConfigError::WrongCardinality {
                name,
                expected,
                actual: weights.len(),
            });
        }
        Self::build(name, weights)
    }

    /// Day-of-week distribution, index 0 = Monday.
    pub fn day_of_week(weights: &[f64]) -> Result<Self, ConfigError> {
        Self::with_cardinality("day-of-week", weights, DAYS_PER_WEEK)
    }

    /// Hour-of-day distribution, index 0 = midnight.
    pub fn hour_of_day(weights: &[f64]) -> Result<Self, ConfigError> {
        Self::with_cardinality("hour-of-day", weights, HOURS_PER_DAY)
    }

    fn build(name: &'static str, weights: &[f64]) -> Result<Self, ConfigError> {
        if weights.is_empty() {
            return Err(ConfigError::EmptyDistribution { name });
        }

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut total = 0.0;
        let mut last_positive = None;
        for (index, &weight) in weights.iter().enumerate() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    name,
                    index,
                    weight,
                });
            }
            if weight > 0.0 {
                last_positive = Some(index);
            }
            total += weight;
            cumulative.push(total);
        }

        let last_positive = last_positive.ok_or(ConfigError::ZeroTotalWeight { name })?;

        Ok(Self {
            name,
            weights: weights.to_vec(),
            cumulative,
            last_positive,
        })
    }

    /// Draw a category index with probability proportional to its weight.
    pub fn sample(&self, rng: &mut RngManager) -> usize {
        let u = rng.next_f64() * self.total();
        let idx = self.cumulative.partition_point(|&c| c <= u);
        if idx < self.cumulative.len() {
            idx
        } else {
            self.last_positive
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Sum of all weights (always > 0).
    pub fn total(&self) -> f64 {
        self.cumulative[self.cumulative.len() - 1]
    }

    /// Exact selection probability of `index`, 0.0 if out of range.
    pub fn probability(&self, index: usize) -> f64 {
        self.weights
            .get(index)
            .map_or(0.0, |w| w / self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rejected() {
        let err = WeightedDistribution::new(&[]).unwrap_err();
        assert_eq!(err, ConfigError::EmptyDistribution { name: "weighted" });
    }

    #[test]
    fn test_all_zero_rejected() {
        let err = WeightedDistribution::day_of_week(&[0.0; 7]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ZeroTotalWeight {
                name: "day-of-week"
            }
        );
    }

    #[test]
    fn test_negative_weight_rejected() {
        let err = WeightedDistribution::new(&[1.0, -0.5]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidWeight { index: 1, .. }
        ));
    }

    #[test]
    fn test_nan_weight_rejected() {
        assert!(WeightedDistribution::new(&[f64::NAN, 1.0]).is_err());
    }

    #[test]
    fn test_hour_cardinality_checked_at_construction() {
        let err = WeightedDistribution::hour_of_day(&[1.0; 23]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::WrongCardinality {
                name: "hour-of-day",
                expected: 24,
                actual: 23,
            }
        );
    }

    #[test]
    fn test_leading_zero_weight_never_selected() {
        let dist = WeightedDistribution::new(&[0.0, 1.0]).unwrap();
        let mut rng = RngManager::new(3);
        for _ in 0..10_000 {
            assert_eq!(dist.sample(&mut rng), 1);
        }
    }

    #[test]
    fn test_probability() {
        let dist = WeightedDistribution::new(&[1.0, 3.0]).unwrap();
        assert_eq!(dist.probability(0), 0.25);
        assert_eq!(dist.probability(1), 0.75);
        assert_eq!(dist.probability(2), 0.0);
    }

    #[test]
    fn test_reference_weights_are_valid() {
        assert!(WeightedDistribution::day_of_week(&REFERENCE_DAY_WEIGHTS).is_ok());
        assert!(WeightedDistribution::hour_of_day(&REFERENCE_HOUR_WEIGHTS).is_ok());
    }
}
