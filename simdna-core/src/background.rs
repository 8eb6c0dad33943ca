//! Models producing the base sequence that things get embedded into.

use std::collections::BTreeMap;

use rand::RngCore;
use rand::seq::SliceRandom;
use serde_json::{Value, json};

use crate::consts::DINUC_SUM_TOLERANCE;
use crate::errors::SimdnaError;
use crate::models::DiscreteDistribution;
use crate::quantity::{FixedQuantityGenerator, QuantityGenerator};
use crate::substring::{SampleFromDiscreteDistributionSubstringGenerator, SubstringGenerator};
use crate::utils::{default_background_freq, default_dinuc_freq};

pub trait BackgroundGenerator {
    fn generate_background(&mut self, rng: &mut dyn RngCore) -> Result<String, SimdnaError>;

    fn to_json(&self) -> Value;
}

/// Concatenates a random number of substrings; the number is drawn once per
/// background, so lengths can vary between backgrounds.
pub struct RepeatedSubstringBackgroundGenerator {
    substring_generator: Box<dyn SubstringGenerator>,
    repetitions: Box<dyn QuantityGenerator>,
}

impl RepeatedSubstringBackgroundGenerator {
    pub fn new(
        substring_generator: Box<dyn SubstringGenerator>,
        repetitions: Box<dyn QuantityGenerator>,
    ) -> Self {
        RepeatedSubstringBackgroundGenerator {
            substring_generator,
            repetitions,
        }
    }
}

impl BackgroundGenerator for RepeatedSubstringBackgroundGenerator {
    fn generate_background(&mut self, rng: &mut dyn RngCore) -> Result<String, SimdnaError> {
        let repetitions = self.repetitions.generate_quantity(rng);
        let mut background = String::new();
        for _ in 0..repetitions {
            let (substring, _) = self.substring_generator.generate_substring(rng)?;
            background.push_str(&substring);
        }
        Ok(background)
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "RepeatedSubstringBackgroundGenerator",
            "substringGenerator": self.substring_generator.to_json(),
            "repetitions": self.repetitions.to_json(),
        })
    }
}

/// Every base drawn independently from one distribution.
pub struct ZeroOrderBackgroundGenerator {
    inner: RepeatedSubstringBackgroundGenerator,
}

impl ZeroOrderBackgroundGenerator {
    pub fn new(seq_len: usize, distribution: DiscreteDistribution<char>) -> Self {
        ZeroOrderBackgroundGenerator {
            inner: RepeatedSubstringBackgroundGenerator::new(
                Box::new(SampleFromDiscreteDistributionSubstringGenerator::new(distribution)),
                Box::new(FixedQuantityGenerator::new(seq_len)),
            ),
        }
    }

    pub fn from_frequencies(
        seq_len: usize,
        frequencies: BTreeMap<char, f64>,
    ) -> Result<Self, SimdnaError> {
        Ok(Self::new(seq_len, DiscreteDistribution::new(frequencies)?))
    }

    /// Uses the default `{A: 0.3, C: 0.2, G: 0.2, T: 0.3}` composition.
    pub fn with_default_frequencies(seq_len: usize) -> Result<Self, SimdnaError> {
        Self::from_frequencies(seq_len, default_background_freq())
    }
}

impl BackgroundGenerator for ZeroOrderBackgroundGenerator {
    fn generate_background(&mut self, rng: &mut dyn RngCore) -> Result<String, SimdnaError> {
        self.inner.generate_background(rng)
    }

    fn to_json(&self) -> Value {
        self.inner.to_json()
    }
}

///
/// First-order Markov backgrounds.
///
/// The first base comes from `prior`; every following base is drawn
/// conditioned on the one before it, with transition rows built by
/// normalizing the dinucleotide table row by row.
///
pub struct FirstOrderBackgroundGenerator {
    seq_len: usize,
    prior: DiscreteDistribution<char>,
    transitions: BTreeMap<char, DiscreteDistribution<char>>,
    dinuc: BTreeMap<String, f64>,
}

impl FirstOrderBackgroundGenerator {
    pub fn new(
        seq_len: usize,
        prior: BTreeMap<char, f64>,
        dinuc: BTreeMap<String, f64>,
    ) -> Result<Self, SimdnaError> {
        if seq_len == 0 {
            return Err(SimdnaError::InvalidParameter(
                "first order backgrounds need a positive length".to_string(),
            ));
        }
        let total: f64 = dinuc.values().sum();
        if (total - 1.0).abs() >= DINUC_SUM_TOLERANCE {
            return Err(SimdnaError::InvalidDinucleotideTable(format!(
                "frequencies sum to {}",
                total
            )));
        }

        let mut rows: BTreeMap<char, BTreeMap<char, f64>> = BTreeMap::new();
        for (key, freq) in &dinuc {
            let mut chars = key.chars();
            let (Some(first), Some(second), None) = (chars.next(), chars.next(), chars.next()) else {
                return Err(SimdnaError::InvalidDinucleotideTable(format!(
                    "key {:?} is not of length 2",
                    key
                )));
            };
            rows.entry(first).or_default().insert(second, *freq);
        }

        let mut transitions = BTreeMap::new();
        for (first, row) in rows {
            let row_total: f64 = row.values().sum();
            if row_total <= 0.0 {
                return Err(SimdnaError::InvalidDinucleotideTable(format!(
                    "no probability mass follows {}",
                    first
                )));
            }
            let normalized = row.into_iter().map(|(c, f)| (c, f / row_total)).collect();
            transitions.insert(first, DiscreteDistribution::new(normalized)?);
        }

        let prior = DiscreteDistribution::new(prior)?;
        let reachable = prior
            .values()
            .iter()
            .chain(transitions.values().flat_map(|d| d.values().iter()));
        for c in reachable {
            if !transitions.contains_key(c) {
                return Err(SimdnaError::InvalidDinucleotideTable(format!(
                    "no transitions out of {}",
                    c
                )));
            }
        }

        Ok(FirstOrderBackgroundGenerator {
            seq_len,
            prior,
            transitions,
            dinuc,
        })
    }

    pub fn with_defaults(seq_len: usize) -> Result<Self, SimdnaError> {
        Self::new(seq_len, default_background_freq(), default_dinuc_freq())
    }
}

impl BackgroundGenerator for FirstOrderBackgroundGenerator {
    fn generate_background(&mut self, rng: &mut dyn RngCore) -> Result<String, SimdnaError> {
        let mut previous = self.prior.sample(rng);
        let mut background = String::with_capacity(self.seq_len);
        background.push(previous);
        for _ in 1..self.seq_len {
            // every reachable symbol was checked for a row at construction
            let row = self
                .transitions
                .get(&previous)
                .ok_or(SimdnaError::InvalidSymbol(previous))?;
            previous = row.sample(rng);
            background.push(previous);
        }
        Ok(background)
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "FirstOrderBackgroundGenerator",
            "seqLength": self.seq_len,
            "priorFrequencies": self.prior.to_json(),
            "dinucFrequencies": self.dinuc,
        })
    }
}

/// Rearranges a string while keeping some of its composition.
pub trait Shuffler {
    fn shuffle(&self, sequence: &str, rng: &mut dyn RngCore) -> String;

    fn to_json(&self) -> Value;
}

/// Keeps single-letter counts only.
pub struct MononucleotideShuffler;

impl Shuffler for MononucleotideShuffler {
    fn shuffle(&self, sequence: &str, rng: &mut dyn RngCore) -> String {
        let mut chars: Vec<char> = sequence.chars().collect();
        chars.shuffle(rng);
        chars.into_iter().collect()
    }

    fn to_json(&self) -> Value {
        json!({"class": "MononucleotideShuffler"})
    }
}

///
/// Keeps every dinucleotide count, as well as the first and last letter.
///
/// Each letter's list of outgoing edges is permuted except for its last
/// edge, then the walk is replayed from the first letter. Keeping the last
/// edges in place guarantees the walk uses every edge.
///
pub struct DinucleotideShuffler;

impl Shuffler for DinucleotideShuffler {
    fn shuffle(&self, sequence: &str, rng: &mut dyn RngCore) -> String {
        let chars: Vec<char> = sequence.chars().collect();
        if chars.len() < 3 {
            return sequence.to_string();
        }

        let mut next_indices: BTreeMap<char, Vec<usize>> = BTreeMap::new();
        for (idx, c) in chars[..chars.len() - 1].iter().enumerate() {
            next_indices.entry(*c).or_default().push(idx + 1);
        }
        for edges in next_indices.values_mut() {
            let last = edges.len() - 1;
            edges[..last].shuffle(rng);
        }

        let mut used: BTreeMap<char, usize> = BTreeMap::new();
        let mut current = 0;
        let mut shuffled = String::with_capacity(chars.len());
        shuffled.push(chars[current]);
        for _ in 1..chars.len() {
            let c = chars[current];
            let counter = used.entry(c).or_insert(0);
            current = next_indices[&c][*counter];
            *counter += 1;
            shuffled.push(chars[current]);
        }
        shuffled
    }

    fn to_json(&self) -> Value {
        json!({"class": "DinucleotideShuffler"})
    }
}

/// A fresh shuffle of the same string every time.
pub struct ShuffledBackgroundGenerator {
    string: String,
    shuffler: Box<dyn Shuffler>,
}

impl ShuffledBackgroundGenerator {
    pub fn new(string: &str, shuffler: Box<dyn Shuffler>) -> Self {
        ShuffledBackgroundGenerator {
            string: string.to_string(),
            shuffler,
        }
    }
}

impl BackgroundGenerator for ShuffledBackgroundGenerator {
    fn generate_background(&mut self, rng: &mut dyn RngCore) -> Result<String, SimdnaError> {
        Ok(self.shuffler.shuffle(&self.string, rng))
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "ShuffledBackgroundGenerator",
            "string": self.string,
            "shuffler": self.shuffler.to_json(),
        })
    }
}

/// Hands out a fixed corpus of backgrounds in order, wrapping around.
pub struct CyclingBackgroundGenerator {
    corpus: Vec<String>,
    next: usize,
}

impl CyclingBackgroundGenerator {
    pub fn new(corpus: Vec<String>) -> Result<Self, SimdnaError> {
        if corpus.is_empty() {
            return Err(SimdnaError::EmptyCorpus);
        }
        Ok(CyclingBackgroundGenerator { corpus, next: 0 })
    }
}

impl BackgroundGenerator for CyclingBackgroundGenerator {
    fn generate_background(&mut self, _rng: &mut dyn RngCore) -> Result<String, SimdnaError> {
        let background = self.corpus[self.next].clone();
        self.next = (self.next + 1) % self.corpus.len();
        Ok(background)
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "CyclingBackgroundGenerator",
            "numBackgrounds": self.corpus.len(),
        })
    }
}

/// The same string, untouched, every time.
pub struct FixedBackgroundGenerator {
    string: String,
}

impl FixedBackgroundGenerator {
    pub fn new(string: &str) -> Self {
        FixedBackgroundGenerator {
            string: string.to_string(),
        }
    }
}

impl BackgroundGenerator for FixedBackgroundGenerator {
    fn generate_background(&mut self, _rng: &mut dyn RngCore) -> Result<String, SimdnaError> {
        Ok(self.string.clone())
    }

    fn to_json(&self) -> Value {
        json!({"class": "FixedBackgroundGenerator", "string": self.string})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::{fixture, rstest};

    use crate::quantity::UniformIntegerGenerator;
    use crate::substring::FixedSubstringGenerator;

    #[fixture]
    fn rng() -> StdRng {
        StdRng::seed_from_u64(31)
    }

    fn dinuc_counts(s: &str) -> BTreeMap<(char, char), usize> {
        let chars: Vec<char> = s.chars().collect();
        let mut counts = BTreeMap::new();
        for pair in chars.windows(2) {
            *counts.entry((pair[0], pair[1])).or_insert(0) += 1;
        }
        counts
    }

    #[rstest]
    fn test_repeated_substring_lengths_vary(mut rng: StdRng) {
        let mut generator = RepeatedSubstringBackgroundGenerator::new(
            Box::new(FixedSubstringGenerator::new("AC")),
            Box::new(UniformIntegerGenerator::new(1, 3).unwrap()),
        );
        for _ in 0..50 {
            let bg = generator.generate_background(&mut rng).unwrap();
            assert!(["AC", "ACAC", "ACACAC"].contains(&bg.as_str()));
        }
    }

    #[rstest]
    fn test_zero_order_length_and_alphabet(mut rng: StdRng) {
        let mut generator = ZeroOrderBackgroundGenerator::with_default_frequencies(200).unwrap();
        let bg = generator.generate_background(&mut rng).unwrap();
        assert_eq!(bg.len(), 200);
        assert!(bg.chars().all(|c| "ACGT".contains(c)));
    }

    #[rstest]
    fn test_first_order_follows_transitions(mut rng: StdRng) {
        // A is always followed by C and C by A
        let prior: BTreeMap<char, f64> = [('A', 1.0)].into_iter().collect();
        let dinuc: BTreeMap<String, f64> = [("AC".to_string(), 0.5), ("CA".to_string(), 0.5)]
            .into_iter()
            .collect();
        let mut generator = FirstOrderBackgroundGenerator::new(7, prior, dinuc).unwrap();
        assert_eq!(generator.generate_background(&mut rng).unwrap(), "ACACACA");
    }

    #[rstest]
    fn test_first_order_defaults(mut rng: StdRng) {
        let mut generator = FirstOrderBackgroundGenerator::with_defaults(100).unwrap();
        assert_eq!(generator.generate_background(&mut rng).unwrap().len(), 100);
    }

    #[rstest]
    #[case(vec![("AC", 0.5), ("CA", 0.4)])]
    #[case(vec![("AC", 0.5), ("CAT", 0.5)])]
    #[case(vec![("AC", 0.5), ("AG", 0.5)])]
    fn test_first_order_rejects_bad_tables(#[case] pairs: Vec<(&str, f64)>) {
        let prior: BTreeMap<char, f64> = [('A', 1.0)].into_iter().collect();
        let dinuc = pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        assert!(matches!(
            FirstOrderBackgroundGenerator::new(10, prior, dinuc),
            Err(SimdnaError::InvalidDinucleotideTable(_))
        ));
    }

    #[rstest]
    #[case("ACGTTGCAAGGCTTACGATCGATCGGGATTACA")]
    #[case("AAAAAAAAAA")]
    #[case("AC")]
    #[case("ACGTAGCTAGCTAGCTAGCATCGATCGATCAGCTAGCAGCGGGGGGTTTTATATATCGACCCA")]
    fn test_dinucleotide_shuffle_preserves_counts(mut rng: StdRng, #[case] input: &str) {
        for _ in 0..20 {
            let shuffled = DinucleotideShuffler.shuffle(input, &mut rng);
            assert_eq!(shuffled.len(), input.len());
            assert_eq!(shuffled.chars().next(), input.chars().next());
            assert_eq!(shuffled.chars().last(), input.chars().last());
            assert_eq!(dinuc_counts(&shuffled), dinuc_counts(input));
        }
    }

    #[rstest]
    fn test_dinucleotide_shuffle_changes_order(mut rng: StdRng) {
        let input = "ACGTAGCTAGCTAGCTAGCATCGATCGATCAGCTAGCAGCGGGGGGTTTTATATATCGACCCA";
        let distinct = (0..20)
            .map(|_| DinucleotideShuffler.shuffle(input, &mut rng))
            .filter(|s| s != input)
            .count();
        assert!(distinct > 0);
    }

    #[rstest]
    fn test_mononucleotide_shuffle(mut rng: StdRng) {
        let mut shuffled: Vec<char> = MononucleotideShuffler
            .shuffle("AACCGGTT", &mut rng)
            .chars()
            .collect();
        shuffled.sort();
        assert_eq!(shuffled.into_iter().collect::<String>(), "AACCGGTT");
    }

    #[rstest]
    fn test_cycling_wraps(mut rng: StdRng) {
        let mut generator =
            CyclingBackgroundGenerator::new(vec!["AA".to_string(), "CC".to_string()]).unwrap();
        let seen: Vec<String> = (0..5)
            .map(|_| generator.generate_background(&mut rng).unwrap())
            .collect();
        assert_eq!(seen, vec!["AA", "CC", "AA", "CC", "AA"]);
        assert!(matches!(
            CyclingBackgroundGenerator::new(vec![]),
            Err(SimdnaError::EmptyCorpus)
        ));
    }

    #[rstest]
    fn test_shuffled_background(mut rng: StdRng) {
        let mut generator =
            ShuffledBackgroundGenerator::new("GATTACAGATTACA", Box::new(DinucleotideShuffler));
        let bg = generator.generate_background(&mut rng).unwrap();
        assert_eq!(dinuc_counts(&bg), dinuc_counts("GATTACAGATTACA"));
        assert_eq!(
            generator.to_json()["shuffler"],
            json!({"class": "DinucleotideShuffler"})
        );
    }
}
