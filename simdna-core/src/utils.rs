use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::consts::{DEFAULT_BACKGROUND_FREQ, DEFAULT_DINUC_FREQ};
use crate::errors::SimdnaError;

/// Draw a uniform value in `[0, 1)`.
pub fn uniform(rng: &mut dyn RngCore) -> f64 {
    rng.random::<f64>()
}

///
/// Sample an index with probability proportional to its weight.
///
/// Does a single cumulative-sum scan against one uniform draw. Floating
/// point error at the tail is absorbed by clamping to the last index.
///
/// # Arguments
///
/// - probs: the (non-empty) weights to sample from
/// - rng: source of randomness
///
pub fn sample_from_probs(probs: &[f64], rng: &mut dyn RngCore) -> usize {
    let total: f64 = probs.iter().sum();
    let target = uniform(rng) * total;
    let mut cumulative = 0.0;
    for (idx, p) in probs.iter().enumerate() {
        cumulative += p;
        if target < cumulative {
            return idx;
        }
    }
    probs.len().saturating_sub(1)
}

/// Uniform index in `0..len`, computed as `floor(u * len)`.
pub fn sample_index(len: usize, rng: &mut dyn RngCore) -> usize {
    ((uniform(rng) * len as f64) as usize).min(len.saturating_sub(1))
}

/// Pick `num_to_sample` distinct indices out of `0..len`, in random order.
pub fn sample_indices_without_replacement(
    len: usize,
    num_to_sample: usize,
    rng: &mut dyn RngCore,
) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    let (picked, _) = indices.partial_shuffle(rng, num_to_sample.min(len));
    picked.to_vec()
}

pub fn complement(base: char) -> Result<char, SimdnaError> {
    match base {
        'A' => Ok('T'),
        'T' => Ok('A'),
        'G' => Ok('C'),
        'C' => Ok('G'),
        'N' => Ok('N'),
        'a' => Ok('t'),
        't' => Ok('a'),
        'g' => Ok('c'),
        'c' => Ok('g'),
        'n' => Ok('n'),
        other => Err(SimdnaError::InvalidSymbol(other)),
    }
}

///
/// Reverse complement a nucleotide string, preserving case.
///
/// Only `A`, `C`, `G`, `T` and `N` (either case) are accepted.
///
pub fn reverse_complement(sequence: &str) -> Result<String, SimdnaError> {
    sequence.chars().rev().map(complement).collect()
}

pub fn default_background_freq() -> BTreeMap<char, f64> {
    DEFAULT_BACKGROUND_FREQ.into_iter().collect()
}

pub fn default_dinuc_freq() -> BTreeMap<String, f64> {
    DEFAULT_DINUC_FREQ
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect()
}
