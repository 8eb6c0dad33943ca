//! Generators of `(substring, description)` pairs.

use std::collections::BTreeMap;
use std::fmt::Display;

use rand::RngCore;
use serde_json::{Value, json};

use crate::consts::{DEFAULT_REVERSE_COMPLEMENT_PROB, MAX_MIN_SCORE_TRIES, REVERSE_COMPLEMENT_MARKER};
use crate::errors::SimdnaError;
use crate::models::{DiscreteDistribution, Pwm};
use crate::motifs::LoadedMotifs;
use crate::mutation::Transformation;
use crate::utils::{reverse_complement, uniform};

pub trait SubstringGenerator {
    /// Produce a substring together with a short, hyphen-free description.
    fn generate_substring(&self, rng: &mut dyn RngCore) -> Result<(String, String), SimdnaError>;

    fn to_json(&self) -> Value;
}

/// Always the same string; the string is its own description.
pub struct FixedSubstringGenerator {
    substring: String,
}

impl FixedSubstringGenerator {
    pub fn new(substring: &str) -> Self {
        FixedSubstringGenerator {
            substring: substring.to_string(),
        }
    }
}

impl SubstringGenerator for FixedSubstringGenerator {
    fn generate_substring(&self, _rng: &mut dyn RngCore) -> Result<(String, String), SimdnaError> {
        Ok((self.substring.clone(), self.substring.clone()))
    }

    fn to_json(&self) -> Value {
        Value::from(format!("fixedSubstring-{}", self.substring))
    }
}

struct MinScore {
    background: BTreeMap<char, f64>,
    min_score: f64,
}

///
/// Samples strings from a PWM, described by the motif name.
///
/// With [`PwmSampler::with_min_score`] samples scoring below the threshold
/// against the background are rejected; after
/// [`MAX_MIN_SCORE_TRIES`] rejections in a row the draw fails.
///
pub struct PwmSampler {
    pwm: Pwm,
    min_score: Option<MinScore>,
}

impl PwmSampler {
    pub fn new(pwm: Pwm) -> Result<Self, SimdnaError> {
        if !pwm.is_finalized() {
            return Err(SimdnaError::PwmNotFinalized(pwm.name().to_string()));
        }
        Ok(PwmSampler {
            pwm,
            min_score: None,
        })
    }

    pub fn from_loaded_motifs(motifs: &LoadedMotifs, motif_name: &str) -> Result<Self, SimdnaError> {
        PwmSampler::new(motifs.get_pwm(motif_name)?.clone())
    }

    pub fn with_min_score(mut self, background: BTreeMap<char, f64>, min_score: f64) -> Self {
        self.min_score = Some(MinScore {
            background,
            min_score,
        });
        self
    }

    pub fn pwm(&self) -> &Pwm {
        &self.pwm
    }
}

impl SubstringGenerator for PwmSampler {
    fn generate_substring(&self, rng: &mut dyn RngCore) -> Result<(String, String), SimdnaError> {
        let description = self.pwm.name().to_string();
        let Some(threshold) = &self.min_score else {
            return Ok((self.pwm.sample(rng)?, description));
        };

        for _ in 0..MAX_MIN_SCORE_TRIES {
            let (sampled, score) = self.pwm.sample_and_score(&threshold.background, rng)?;
            if score >= threshold.min_score {
                return Ok((sampled, description));
            }
        }
        Err(SimdnaError::MinScoreNotReached {
            name: description,
            min_score: threshold.min_score,
            tries: MAX_MIN_SCORE_TRIES,
        })
    }

    fn to_json(&self) -> Value {
        match &self.min_score {
            Some(threshold) => json!({
                "class": "PwmSampler",
                "motifName": self.pwm.name(),
                "minScore": threshold.min_score,
                "background": threshold.background.iter().map(|(k, v)| (k.to_string(), *v)).collect::<BTreeMap<String, f64>>(),
            }),
            None => json!({"class": "PwmSampler", "motifName": self.pwm.name()}),
        }
    }
}

/// The consensus string of a PWM, every time.
pub struct BestHitPwm {
    pwm: Pwm,
}

impl BestHitPwm {
    pub fn new(pwm: Pwm) -> Result<Self, SimdnaError> {
        pwm.best_hit()?;
        Ok(BestHitPwm { pwm })
    }

    pub fn from_loaded_motifs(motifs: &LoadedMotifs, motif_name: &str) -> Result<Self, SimdnaError> {
        BestHitPwm::new(motifs.get_pwm(motif_name)?.clone())
    }
}

impl SubstringGenerator for BestHitPwm {
    fn generate_substring(&self, _rng: &mut dyn RngCore) -> Result<(String, String), SimdnaError> {
        Ok((self.pwm.best_hit()?.to_string(), self.pwm.name().to_string()))
    }

    fn to_json(&self) -> Value {
        json!({"class": "BestHitPwm", "pwm": self.pwm.name()})
    }
}

/// Reverse complements the inner generator's output with probability `prob`
/// and marks the description with a `revComp-` prefix.
pub struct ReverseComplementWrapper {
    inner: Box<dyn SubstringGenerator>,
    prob: f64,
}

impl ReverseComplementWrapper {
    pub fn new(inner: Box<dyn SubstringGenerator>) -> Self {
        ReverseComplementWrapper {
            inner,
            prob: DEFAULT_REVERSE_COMPLEMENT_PROB,
        }
    }

    pub fn with_prob(mut self, prob: f64) -> Result<Self, SimdnaError> {
        if !(0.0..=1.0).contains(&prob) {
            return Err(SimdnaError::InvalidParameter(format!(
                "reverse complement probability must lie in [0, 1], got {}",
                prob
            )));
        }
        self.prob = prob;
        Ok(self)
    }
}

impl SubstringGenerator for ReverseComplementWrapper {
    fn generate_substring(&self, rng: &mut dyn RngCore) -> Result<(String, String), SimdnaError> {
        let (seq, description) = self.inner.generate_substring(rng)?;
        if uniform(rng) < self.prob {
            Ok((
                reverse_complement(&seq)?,
                format!("{}-{}", REVERSE_COMPLEMENT_MARKER, description),
            ))
        } else {
            Ok((seq, description))
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "ReverseComplementWrapper",
            "reverseComplementProb": self.prob,
            "substringGenerator": self.inner.to_json(),
        })
    }
}

/// Runs the inner generator's output through a list of transformations.
/// The description becomes `<transformations description>-<inner description>`.
pub struct TransformedSubstringGenerator {
    inner: Box<dyn SubstringGenerator>,
    transformations: Vec<Box<dyn Transformation>>,
    description: String,
}

impl TransformedSubstringGenerator {
    pub fn new(
        inner: Box<dyn SubstringGenerator>,
        transformations: Vec<Box<dyn Transformation>>,
    ) -> Self {
        TransformedSubstringGenerator {
            inner,
            transformations,
            description: "transformations".to_string(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

impl SubstringGenerator for TransformedSubstringGenerator {
    fn generate_substring(&self, rng: &mut dyn RngCore) -> Result<(String, String), SimdnaError> {
        let (seq, description) = self.inner.generate_substring(rng)?;
        let mut chars: Vec<char> = seq.chars().collect();
        for transformation in &self.transformations {
            transformation.transform(&mut chars, rng)?;
        }
        Ok((
            chars.into_iter().collect(),
            format!("{}-{}", self.description, description),
        ))
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "TransformedSubstringGenerator",
            "substringGenerator": self.inner.to_json(),
            "transformations": self.transformations.iter().map(|t| t.to_json()).collect::<Vec<_>>(),
        })
    }
}

/// One value drawn from a discrete distribution; with single letters this
/// is the building block of i.i.d. backgrounds.
pub struct SampleFromDiscreteDistributionSubstringGenerator<T> {
    distribution: DiscreteDistribution<T>,
}

impl<T: Ord + Clone + Display> SampleFromDiscreteDistributionSubstringGenerator<T> {
    pub fn new(distribution: DiscreteDistribution<T>) -> Self {
        SampleFromDiscreteDistributionSubstringGenerator { distribution }
    }
}

impl<T: Ord + Clone + Display> SubstringGenerator
    for SampleFromDiscreteDistributionSubstringGenerator<T>
{
    fn generate_substring(&self, rng: &mut dyn RngCore) -> Result<(String, String), SimdnaError> {
        let value = self.distribution.sample(rng).to_string();
        Ok((value.clone(), value))
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "SampleFromDiscreteDistributionSubstringGenerator",
            "discreteDistribution": self.distribution.to_json(),
        })
    }
}
