use std::collections::BTreeMap;
use std::fmt::{self, Display};

use rand::RngCore;
use serde::Serialize;

use crate::consts::{DEFAULT_LETTERS, ROW_SUM_TOLERANCE};
use crate::errors::SimdnaError;
use crate::utils::sample_from_probs;

/// A position weight matrix: one probability distribution over the alphabet
/// per motif position.
///
/// Rows are appended while the matrix is open. [`Pwm::finalize`] smooths
/// the rows with a pseudocount and closes the matrix; only a closed matrix
/// can be sampled, scored or read.
///
/// # Example
/// ```
/// use simdna_core::models::Pwm;
///
/// let mut pwm = Pwm::new("toy");
/// pwm.add_rows(vec![vec![0.9, 0.1, 0.0, 0.0], vec![0.0, 0.0, 0.2, 0.8]]).unwrap();
/// pwm.finalize(0.001).unwrap();
/// assert_eq!(pwm.best_hit().unwrap(), "AT");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Pwm {
    name: String,
    letters: Vec<char>,
    rows: Vec<Vec<f64>>,
    #[serde(skip)]
    log_rows: Vec<Vec<f64>>,
    #[serde(skip)]
    best_hit: String,
    #[serde(skip)]
    finalized: bool,
}

impl Pwm {
    pub fn new(name: &str) -> Self {
        Pwm::with_alphabet(name, DEFAULT_LETTERS.to_vec())
    }

    /// Create an open matrix over a custom alphabet; row entries follow the
    /// order of `letters`.
    pub fn with_alphabet(name: &str, letters: Vec<char>) -> Self {
        Pwm {
            name: name.to_string(),
            letters,
            rows: Vec::new(),
            log_rows: Vec::new(),
            best_hit: String::new(),
            finalized: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn add_row(&mut self, weights: Vec<f64>) -> Result<(), SimdnaError> {
        if self.finalized {
            return Err(SimdnaError::PwmAlreadyFinalized(self.name.clone()));
        }
        let expected = self
            .rows
            .first()
            .map(|r| r.len())
            .unwrap_or(self.letters.len());
        if weights.len() != expected || weights.len() != self.letters.len() {
            return Err(SimdnaError::RowLengthMismatch {
                name: self.name.clone(),
                expected,
                found: weights.len(),
            });
        }
        self.rows.push(weights);
        Ok(())
    }

    pub fn add_rows(&mut self, matrix: Vec<Vec<f64>>) -> Result<&mut Self, SimdnaError> {
        for row in matrix {
            self.add_row(row)?;
        }
        Ok(self)
    }

    ///
    /// Smooth every row with `row * (1 - p) + p / alphabet_size` and close
    /// the matrix.
    ///
    /// Calling this on a matrix that is already closed does nothing.
    ///
    /// # Arguments
    ///
    /// - pseudocount_prob: smoothing weight in `[0, 1)`
    ///
    pub fn finalize(&mut self, pseudocount_prob: f64) -> Result<&mut Self, SimdnaError> {
        if self.finalized {
            return Ok(self);
        }
        if !(0.0..1.0).contains(&pseudocount_prob) {
            return Err(SimdnaError::InvalidPseudocount(pseudocount_prob));
        }
        if self.rows.is_empty() {
            return Err(SimdnaError::EmptyPwm(self.name.clone()));
        }

        let alphabet_size = self.letters.len() as f64;
        let smoothed: Vec<Vec<f64>> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|w| w * (1.0 - pseudocount_prob) + pseudocount_prob / alphabet_size)
                    .collect()
            })
            .collect();

        for (idx, row) in smoothed.iter().enumerate() {
            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() >= ROW_SUM_TOLERANCE {
                return Err(SimdnaError::RowNotNormalized {
                    name: self.name.clone(),
                    row: idx,
                    sum,
                });
            }
        }

        self.log_rows = smoothed
            .iter()
            .map(|row| row.iter().map(|p| p.ln()).collect())
            .collect();
        self.best_hit = smoothed
            .iter()
            .map(|row| self.letters[arg_max(row)])
            .collect();
        self.rows = smoothed;
        self.finalized = true;
        Ok(self)
    }

    fn ensure_finalized(&self) -> Result<(), SimdnaError> {
        if self.finalized {
            Ok(())
        } else {
            Err(SimdnaError::PwmNotFinalized(self.name.clone()))
        }
    }

    pub fn rows(&self) -> Result<&[Vec<f64>], SimdnaError> {
        self.ensure_finalized()?;
        Ok(&self.rows)
    }

    pub fn log_rows(&self) -> Result<&[Vec<f64>], SimdnaError> {
        self.ensure_finalized()?;
        Ok(&self.log_rows)
    }

    /// The consensus string: the most probable letter at every position.
    pub fn best_hit(&self) -> Result<&str, SimdnaError> {
        self.ensure_finalized()?;
        Ok(&self.best_hit)
    }

    /// Number of positions in the motif.
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn sample(&self, rng: &mut dyn RngCore) -> Result<String, SimdnaError> {
        self.ensure_finalized()?;
        Ok(self
            .rows
            .iter()
            .map(|row| self.letters[sample_from_probs(row, rng)])
            .collect())
    }

    ///
    /// Sample a string and return it with its log-odds score against a
    /// background.
    ///
    /// The score is the sum over positions of
    /// `ln P(letter | row) - ln P(letter | background)`.
    ///
    pub fn sample_and_score(
        &self,
        background: &BTreeMap<char, f64>,
        rng: &mut dyn RngCore,
    ) -> Result<(String, f64), SimdnaError> {
        self.ensure_finalized()?;
        let mut sampled = String::with_capacity(self.rows.len());
        let mut log_odds = 0.0;
        for (row, log_row) in self.rows.iter().zip(self.log_rows.iter()) {
            let idx = sample_from_probs(row, rng);
            let letter = self.letters[idx];
            log_odds += log_row[idx] - background_log_prob(background, letter)?;
            sampled.push(letter);
        }
        Ok((sampled, log_odds))
    }

    /// Log-odds of a given string of the motif's length against a background.
    pub fn score(&self, sequence: &str, background: &BTreeMap<char, f64>) -> Result<f64, SimdnaError> {
        self.ensure_finalized()?;
        let letters: Vec<char> = sequence.chars().collect();
        if letters.len() != self.rows.len() {
            return Err(SimdnaError::InvalidParameter(format!(
                "cannot score a string of length {} against PWM {} of length {}",
                letters.len(),
                self.name,
                self.rows.len()
            )));
        }

        let mut log_odds = 0.0;
        for (letter, log_row) in letters.into_iter().zip(self.log_rows.iter()) {
            let idx = self
                .letters
                .iter()
                .position(|l| *l == letter)
                .ok_or(SimdnaError::InvalidSymbol(letter))?;
            log_odds += log_row[idx] - background_log_prob(background, letter)?;
        }
        Ok(log_odds)
    }
}

fn background_log_prob(background: &BTreeMap<char, f64>, letter: char) -> Result<f64, SimdnaError> {
    background
        .get(&letter)
        .map(|p| p.ln())
        .ok_or(SimdnaError::InvalidSymbol(letter))
}

// first index wins on ties
fn arg_max(row: &[f64]) -> usize {
    let mut best = 0;
    for (idx, value) in row.iter().enumerate() {
        if *value > row[best] {
            best = idx;
        }
    }
    best
}

impl Display for Pwm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        for row in &self.rows {
            let formatted: Vec<String> = row.iter().map(|p| format!("{:.6}", p)).collect();
            writeln!(f, "{}", formatted.join("\t"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::{fixture, rstest};

    use crate::utils::default_background_freq;

    #[fixture]
    fn rows() -> Vec<Vec<f64>> {
        vec![
            vec![0.095290, 0.318729, 0.083242, 0.502739],
            vec![0.182913, 0.158817, 0.453450, 0.204820],
            vec![0.008762, 0.989047, 0.000000, 0.002191],
            vec![0.814896, 0.014239, 0.071194, 0.099671],
            vec![0.005488, 0.000000, 0.991218, 0.003294],
        ]
    }

    #[fixture]
    fn pwm(rows: Vec<Vec<f64>>) -> Pwm {
        let mut pwm = Pwm::new("some_name");
        pwm.add_rows(rows).unwrap();
        pwm.finalize(0.001).unwrap();
        pwm
    }

    #[rstest]
    fn test_finalize_smooths_rows(rows: Vec<Vec<f64>>, pwm: Pwm) {
        for (raw, smoothed) in rows.iter().zip(pwm.rows().unwrap()) {
            for (r, s) in raw.iter().zip(smoothed) {
                assert!((r * 0.999 + 0.001 / 4.0 - s).abs() < 1e-12);
            }
            let sum: f64 = smoothed.iter().sum();
            assert!((sum - 1.0).abs() < ROW_SUM_TOLERANCE);
        }
    }

    #[rstest]
    fn test_best_hit_is_per_row_arg_max(pwm: Pwm) {
        assert_eq!(pwm.best_hit().unwrap(), "TGCAG");
        assert_eq!(pwm.size(), 5);
    }

    #[rstest]
    fn test_row_length_mismatch() {
        let mut pwm = Pwm::new("bad");
        pwm.add_row(vec![0.25, 0.25, 0.25, 0.25]).unwrap();
        let result = pwm.add_row(vec![0.5, 0.5]);
        assert!(matches!(
            result,
            Err(SimdnaError::RowLengthMismatch { expected: 4, found: 2, .. })
        ));
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.0)]
    #[case(2.5)]
    fn test_invalid_pseudocount(#[case] pseudocount: f64, rows: Vec<Vec<f64>>) {
        let mut pwm = Pwm::new("p");
        pwm.add_rows(rows).unwrap();
        assert!(matches!(
            pwm.finalize(pseudocount),
            Err(SimdnaError::InvalidPseudocount(_))
        ));
    }

    #[rstest]
    fn test_unnormalized_row_is_rejected() {
        let mut pwm = Pwm::new("unnormalized");
        pwm.add_row(vec![0.5, 0.5, 0.5, 0.5]).unwrap();
        assert!(matches!(
            pwm.finalize(0.0),
            Err(SimdnaError::RowNotNormalized { row: 0, .. })
        ));
    }

    #[rstest]
    fn test_open_pwm_cannot_be_used(rows: Vec<Vec<f64>>) {
        let mut pwm = Pwm::new("open");
        pwm.add_rows(rows).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(pwm.sample(&mut rng), Err(SimdnaError::PwmNotFinalized(_))));
        assert!(matches!(pwm.rows(), Err(SimdnaError::PwmNotFinalized(_))));
        assert!(matches!(pwm.best_hit(), Err(SimdnaError::PwmNotFinalized(_))));
    }

    #[rstest]
    fn test_closed_pwm_rejects_rows(mut pwm: Pwm) {
        assert!(matches!(
            pwm.add_row(vec![0.25; 4]),
            Err(SimdnaError::PwmAlreadyFinalized(_))
        ));
        // a second finalize leaves the rows alone
        let before = pwm.rows().unwrap().to_vec();
        pwm.finalize(0.5).unwrap();
        assert_eq!(pwm.rows().unwrap(), before.as_slice());
    }

    #[rstest]
    fn test_sample_has_motif_length(pwm: Pwm) {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let sample = pwm.sample(&mut rng).unwrap();
            assert_eq!(sample.len(), 5);
            assert!(sample.chars().all(|c| "ACGT".contains(c)));
        }
    }

    #[rstest]
    fn test_sample_and_score_matches_score(pwm: Pwm) {
        let mut rng = StdRng::seed_from_u64(9);
        let bg = default_background_freq();
        for _ in 0..50 {
            let (sample, log_odds) = pwm.sample_and_score(&bg, &mut rng).unwrap();
            let rescored = pwm.score(&sample, &bg).unwrap();
            assert!((log_odds - rescored).abs() < 1e-9);
        }
    }

    #[rstest]
    fn test_best_hit_scores_highest(pwm: Pwm) {
        let bg: BTreeMap<char, f64> = "ACGT".chars().map(|c| (c, 0.25)).collect();
        let best = pwm.score(pwm.best_hit().unwrap(), &bg).unwrap();
        let other = pwm.score("AAAAA", &bg).unwrap();
        assert!(best > other);
    }
}
