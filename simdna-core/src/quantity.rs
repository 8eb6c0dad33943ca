//! Integer-valued distributions used for counts and separations.

use rand::RngCore;
use rand_distr::{Distribution, Poisson};
use serde_json::{Value, json};
use tracing::warn;

use crate::consts::RETRY_WARNING_INTERVAL;
use crate::errors::SimdnaError;
use crate::utils::{sample_index, uniform};

pub trait QuantityGenerator {
    fn generate_quantity(&self, rng: &mut dyn RngCore) -> usize;

    /// JSON description of the generator, written to the info file.
    fn to_json(&self) -> Value;
}

fn check_probability(name: &str, p: f64) -> Result<(), SimdnaError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(SimdnaError::InvalidParameter(format!(
            "{} must lie in [0, 1], got {}",
            name, p
        )))
    }
}

pub struct FixedQuantityGenerator {
    quantity: usize,
}

impl FixedQuantityGenerator {
    pub fn new(quantity: usize) -> Self {
        FixedQuantityGenerator { quantity }
    }
}

impl QuantityGenerator for FixedQuantityGenerator {
    fn generate_quantity(&self, _rng: &mut dyn RngCore) -> usize {
        self.quantity
    }

    fn to_json(&self) -> Value {
        Value::from(format!("fixedQuantity-{}", self.quantity))
    }
}

/// Uniform over `min..=max`, computed as `min + floor(u * (1 + max - min))`.
pub struct UniformIntegerGenerator {
    min: usize,
    max: usize,
}

impl UniformIntegerGenerator {
    pub fn new(min: usize, max: usize) -> Result<Self, SimdnaError> {
        if min > max {
            return Err(SimdnaError::InvalidParameter(format!(
                "uniform integer range has min {} above max {}",
                min, max
            )));
        }
        Ok(UniformIntegerGenerator { min, max })
    }
}

impl QuantityGenerator for UniformIntegerGenerator {
    fn generate_quantity(&self, rng: &mut dyn RngCore) -> usize {
        self.min + sample_index(1 + self.max - self.min, rng)
    }

    fn to_json(&self) -> Value {
        json!({"class": "UniformIntegerGenerator", "minVal": self.min, "maxVal": self.max})
    }
}

pub struct PoissonQuantityGenerator {
    mean: f64,
    // None when the mean is zero; the draw is then always zero
    poisson: Option<Poisson<f64>>,
}

impl PoissonQuantityGenerator {
    pub fn new(mean: f64) -> Result<Self, SimdnaError> {
        if !mean.is_finite() || mean < 0.0 {
            return Err(SimdnaError::InvalidParameter(format!(
                "poisson mean must be finite and non-negative, got {}",
                mean
            )));
        }
        let poisson = if mean > 0.0 {
            Some(Poisson::new(mean).map_err(|e| SimdnaError::InvalidParameter(e.to_string()))?)
        } else {
            None
        };
        Ok(PoissonQuantityGenerator { mean, poisson })
    }
}

impl QuantityGenerator for PoissonQuantityGenerator {
    fn generate_quantity(&self, rng: &mut dyn RngCore) -> usize {
        match &self.poisson {
            Some(poisson) => poisson.sample(rng) as usize,
            None => 0,
        }
    }

    fn to_json(&self) -> Value {
        Value::from(format!("poisson-{}", self.mean))
    }
}

/// Returns 1 when a uniform draw is at most `prob`, else 0.
pub struct BernoulliQuantityGenerator {
    prob: f64,
}

impl BernoulliQuantityGenerator {
    pub fn new(prob: f64) -> Result<Self, SimdnaError> {
        check_probability("bernoulli probability", prob)?;
        Ok(BernoulliQuantityGenerator { prob })
    }
}

impl QuantityGenerator for BernoulliQuantityGenerator {
    fn generate_quantity(&self, rng: &mut dyn RngCore) -> usize {
        usize::from(uniform(rng) <= self.prob)
    }

    fn to_json(&self) -> Value {
        Value::from(format!("bernoulli-{}", self.prob))
    }
}

pub struct ChooseValueFromASet {
    values: Vec<usize>,
}

impl ChooseValueFromASet {
    pub fn new(values: Vec<usize>) -> Result<Self, SimdnaError> {
        if values.is_empty() {
            return Err(SimdnaError::InvalidParameter(
                "cannot choose from an empty set of values".to_string(),
            ));
        }
        Ok(ChooseValueFromASet { values })
    }
}

impl QuantityGenerator for ChooseValueFromASet {
    fn generate_quantity(&self, rng: &mut dyn RngCore) -> usize {
        self.values[sample_index(self.values.len(), rng)]
    }

    fn to_json(&self) -> Value {
        json!({"class": "ChooseValueFromASet", "possibleValues": self.values})
    }
}

/// With probability `zero_prob` returns 0, otherwise delegates.
pub struct ZeroInflater {
    inner: Box<dyn QuantityGenerator>,
    zero_prob: f64,
}

impl ZeroInflater {
    pub fn new(inner: Box<dyn QuantityGenerator>, zero_prob: f64) -> Result<Self, SimdnaError> {
        check_probability("zero probability", zero_prob)?;
        Ok(ZeroInflater { inner, zero_prob })
    }
}

impl QuantityGenerator for ZeroInflater {
    fn generate_quantity(&self, rng: &mut dyn RngCore) -> usize {
        if uniform(rng) < self.zero_prob {
            0
        } else {
            self.inner.generate_quantity(rng)
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "ZeroInflater",
            "zeroProb": self.zero_prob,
            "quantityGenerator": self.inner.to_json(),
        })
    }
}

///
/// Restrict a distribution to `[min, max]` by resampling.
///
/// There is no cap on the number of draws; a warning is logged every
/// [`RETRY_WARNING_INTERVAL`] failed draws.
///
pub struct MinMaxWrapper {
    inner: Box<dyn QuantityGenerator>,
    min: Option<usize>,
    max: Option<usize>,
}

impl MinMaxWrapper {
    pub fn new(
        inner: Box<dyn QuantityGenerator>,
        min: Option<usize>,
        max: Option<usize>,
    ) -> Result<Self, SimdnaError> {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(SimdnaError::InvalidParameter(format!(
                    "min {} is above max {}",
                    lo, hi
                )));
            }
        }
        Ok(MinMaxWrapper { inner, min, max })
    }

    fn in_range(&self, quantity: usize) -> bool {
        self.min.is_none_or(|lo| quantity >= lo) && self.max.is_none_or(|hi| quantity <= hi)
    }
}

impl QuantityGenerator for MinMaxWrapper {
    fn generate_quantity(&self, rng: &mut dyn RngCore) -> usize {
        let mut tries = 0;
        loop {
            tries += 1;
            let quantity = self.inner.generate_quantity(rng);
            if self.in_range(quantity) {
                return quantity;
            }
            if tries % RETRY_WARNING_INTERVAL == 0 {
                warn!(
                    "made {} tries at trying to sample from distribution with min/max limits",
                    tries
                );
            }
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "MinMaxWrapper",
            "min": self.min,
            "max": self.max,
            "quantityGenerator": self.inner.to_json(),
        })
    }
}
