//! Readers for the ENCODE and HOMER motif file formats.

use std::io::BufRead;
use std::path::Path;

use simdna_core::models::Pwm;
use simdna_core::motifs::LoadedMotifs;

use crate::error::{Result, SimdnaIoError};
use crate::utils::get_dynamic_reader;

#[derive(Debug, Clone, Copy)]
enum MotifFormat {
    /// `>NAME ...` headers; rows are `<letter> pA pC pG pT`.
    Encode,
    /// `>CONSENSUS NAME ...` headers; rows are `pA pC pG pT`.
    Homer,
}

impl MotifFormat {
    fn name_column(&self) -> usize {
        match self {
            MotifFormat::Encode => 0,
            MotifFormat::Homer => 1,
        }
    }

    fn skipped_row_columns(&self) -> usize {
        match self {
            MotifFormat::Encode => 1,
            MotifFormat::Homer => 0,
        }
    }
}

fn load_motifs(path: &Path, pseudocount_prob: f64, format: MotifFormat) -> Result<LoadedMotifs> {
    let reader = get_dynamic_reader(path)?;
    let mut pwms: Vec<Pwm> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = idx + 1;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            let name = header
                .split_whitespace()
                .nth(format.name_column())
                .ok_or_else(|| SimdnaIoError::MotifParse {
                    line: line_number,
                    message: format!("header {:?} has no motif name", line),
                })?;
            pwms.push(Pwm::new(name));
            continue;
        }

        let current = pwms.last_mut().ok_or_else(|| SimdnaIoError::MotifParse {
            line: line_number,
            message: "matrix row before any motif header".to_string(),
        })?;
        let row = line
            .split_whitespace()
            .skip(format.skipped_row_columns())
            .map(|x| x.parse::<f64>())
            .collect::<std::result::Result<Vec<f64>, _>>()
            .map_err(|e| SimdnaIoError::MotifParse {
                line: line_number,
                message: e.to_string(),
            })?;
        current.add_row(row)?;
    }

    let mut motifs = LoadedMotifs::new();
    for mut pwm in pwms {
        pwm.finalize(pseudocount_prob)?;
        motifs.insert(pwm)?;
    }
    Ok(motifs)
}

///
/// Load every motif from a file in the ENCODE motifs.txt format.
///
/// # Arguments
///
/// - path: the motif file, optionally gzip'd
/// - pseudocount_prob: smoothing applied to every matrix on finalization
///
pub fn load_encode_motifs(path: &Path, pseudocount_prob: f64) -> Result<LoadedMotifs> {
    load_motifs(path, pseudocount_prob, MotifFormat::Encode)
}

/// Load every motif from a HOMER-style `.motif` file.
pub fn load_homer_motifs(path: &Path, pseudocount_prob: f64) -> Result<LoadedMotifs> {
    load_motifs(path, pseudocount_prob, MotifFormat::Homer)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use simdna_core::SimdnaError;

    fn write_motif_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[rstest]
    fn test_row_before_header() {
        let file = write_motif_file("0.25 0.25 0.25 0.25\n");
        assert!(matches!(
            load_homer_motifs(file.path(), 0.0),
            Err(SimdnaIoError::MotifParse { line: 1, .. })
        ));
    }

    #[rstest]
    fn test_bad_number() {
        let file = write_motif_file(">ACG  m1\n0.25 0.25 zero 0.5\n");
        assert!(matches!(
            load_homer_motifs(file.path(), 0.0),
            Err(SimdnaIoError::MotifParse { line: 2, .. })
        ));
    }

    #[rstest]
    fn test_row_length_mismatch_surfaces() {
        let file = write_motif_file(">m1 info\nA 0.5 0.5 0.0\n");
        assert!(matches!(
            load_encode_motifs(file.path(), 0.0),
            Err(SimdnaIoError::Core(SimdnaError::RowLengthMismatch { .. }))
        ));
    }

    #[rstest]
    fn test_blank_lines_are_skipped() {
        let file = write_motif_file(">m1 info\n\nA 1.0 0.0 0.0 0.0\n\nC 0.0 1.0 0.0 0.0\n");
        let motifs = load_encode_motifs(file.path(), 0.0).unwrap();
        assert_eq!(motifs.get_pwm("m1").unwrap().best_hit().unwrap(), "AC");
    }
}
