use std::collections::BTreeMap;
use std::fmt::Display;

use rand::RngCore;
use serde_json::{Map, Value};

use crate::consts::DISTRIBUTION_SUM_TOLERANCE;
use crate::errors::SimdnaError;
use crate::utils::sample_from_probs;

/// A finite distribution over values, sampled by cumulative inversion.
///
/// Values are kept in sorted order so that the same seed always maps to the
/// same value regardless of how the distribution was built.
#[derive(Debug, Clone)]
pub struct DiscreteDistribution<T> {
    values: Vec<T>,
    probs: Vec<f64>,
}

impl<T: Ord + Clone> DiscreteDistribution<T> {
    pub fn new(val_to_freq: BTreeMap<T, f64>) -> Result<Self, SimdnaError> {
        if val_to_freq.is_empty() {
            return Err(SimdnaError::InvalidDistribution(
                "distribution has no values".to_string(),
            ));
        }
        if val_to_freq.values().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(SimdnaError::InvalidDistribution(
                "probabilities must be finite and non-negative".to_string(),
            ));
        }
        let total: f64 = val_to_freq.values().sum();
        if (total - 1.0).abs() >= DISTRIBUTION_SUM_TOLERANCE {
            return Err(SimdnaError::InvalidDistribution(format!(
                "probabilities sum to {}",
                total
            )));
        }

        let (values, probs) = val_to_freq.into_iter().unzip();
        Ok(DiscreteDistribution { values, probs })
    }

    pub fn sample(&self, rng: &mut dyn RngCore) -> T {
        self.values[sample_from_probs(&self.probs, rng)].clone()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn probability_of(&self, value: &T) -> Option<f64> {
        self.values
            .iter()
            .position(|v| v == value)
            .map(|idx| self.probs[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, f64)> {
        self.values.iter().zip(self.probs.iter().copied())
    }
}

impl<T: Ord + Clone + Display> DiscreteDistribution<T> {
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .map(|(v, p)| (v.to_string(), Value::from(p)))
            .collect();
        Value::Object(map)
    }
}
