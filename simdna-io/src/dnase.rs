//! Simulations driven by a description file of real sequences and the
//! motif positions to plant in them.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use rand::RngCore;
use serde_json::{Value, json};
use simdna_core::SimdnaError;
use simdna_core::assembly::{SequenceSetGenerator, generate_sequence_given_background_and_embedders};
use simdna_core::background::{FixedBackgroundGenerator, Shuffler};
use simdna_core::embeddable_gen::SubstringEmbeddableGenerator;
use simdna_core::embedders::{Embedder, FixedEmbeddableWithPosEmbedder};
use simdna_core::models::GeneratedSequence;
use simdna_core::motifs::LoadedMotifs;
use simdna_core::substring::{PwmSampler, ReverseComplementWrapper};

use crate::error::{Result, SimdnaIoError};
use crate::utils::get_dynamic_reader;

/// One line of a description file.
#[derive(Debug, Clone, PartialEq)]
pub struct DnaseEntry {
    pub name: String,
    pub sequence: String,
    /// `(motif name, start)` pairs, in file order.
    pub motifs: Vec<(String, usize)>,
}

fn parse_motif_position(field: &str, line: usize) -> Result<(String, usize)> {
    let (motif, pos) = field
        .rsplit_once('-')
        .ok_or_else(|| SimdnaIoError::MalformedLine {
            line,
            message: format!("{:?} is not of the form <motif>-<position>", field),
        })?;
    let pos = pos.parse::<usize>().map_err(|e| SimdnaIoError::MalformedLine {
        line,
        message: format!("position in {:?}: {}", field, e),
    })?;
    Ok((motif.to_string(), pos))
}

///
/// Parse a description file with a header line and the columns
/// `name<TAB>sequence<TAB>motif1-pos1,motif2-pos2,...`.
///
/// The motif column may be empty or missing.
///
pub fn read_dnase_description_file(path: &Path) -> Result<Vec<DnaseEntry>> {
    let reader = get_dynamic_reader(path)?;
    let mut entries = Vec::new();

    for (idx, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        let line_number = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
        if columns.len() < 2 {
            return Err(SimdnaIoError::MalformedLine {
                line: line_number,
                message: format!("expected at least 2 columns, found {}", columns.len()),
            });
        }
        let motifs = columns
            .get(2)
            .map(|c| {
                c.split(',')
                    .filter(|f| !f.is_empty())
                    .map(|f| parse_motif_position(f, line_number))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?
            .unwrap_or_default();

        entries.push(DnaseEntry {
            name: columns[0].to_string(),
            sequence: columns[1].to_string(),
            motifs,
        });
    }

    Ok(entries)
}

///
/// Plants PWM samples at the positions listed in a description file.
///
/// Each described sequence becomes one generated sequence with the same
/// name. Its background is the described sequence, shuffled when a shuffler
/// is given. Each motif is sampled from its PWM, reverse complemented half
/// of the time, and embedded at its listed position or the nearest free one.
///
pub struct DnaseSimulation {
    description_file: PathBuf,
    entries: Vec<DnaseEntry>,
    loaded_motifs: LoadedMotifs,
    shuffler: Option<Box<dyn Shuffler>>,
}

impl DnaseSimulation {
    pub fn new(
        description_file: &Path,
        loaded_motifs: LoadedMotifs,
        shuffler: Option<Box<dyn Shuffler>>,
    ) -> Result<Self> {
        let entries = read_dnase_description_file(description_file)?;
        for entry in &entries {
            for (motif, _) in &entry.motifs {
                loaded_motifs.get_pwm(motif)?;
            }
        }
        Ok(DnaseSimulation {
            description_file: description_file.to_path_buf(),
            entries,
            loaded_motifs,
            shuffler,
        })
    }

    pub fn entries(&self) -> &[DnaseEntry] {
        &self.entries
    }

    fn embedders_for(&self, entry: &DnaseEntry) -> std::result::Result<Vec<Box<dyn Embedder>>, SimdnaError> {
        entry
            .motifs
            .iter()
            .map(|(motif, pos)| {
                let sampler = PwmSampler::from_loaded_motifs(&self.loaded_motifs, motif)?;
                let generator = SubstringEmbeddableGenerator::new(Box::new(
                    ReverseComplementWrapper::new(Box::new(sampler)),
                ));
                Ok(Box::new(FixedEmbeddableWithPosEmbedder::new(Box::new(generator), *pos))
                    as Box<dyn Embedder>)
            })
            .collect()
    }
}

impl SequenceSetGenerator for DnaseSimulation {
    fn generate_sequences(
        &mut self,
        rng: &mut dyn RngCore,
    ) -> std::result::Result<Vec<GeneratedSequence>, SimdnaError> {
        let mut generated = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let background = match &self.shuffler {
                Some(shuffler) => shuffler.shuffle(&entry.sequence, rng),
                None => entry.sequence.clone(),
            };
            let embedders = self.embedders_for(entry)?;
            generated.push(generate_sequence_given_background_and_embedders(
                &mut FixedBackgroundGenerator::new(&background),
                &embedders,
                &entry.name,
                rng,
            )?);
        }
        Ok(generated)
    }

    fn to_json(&self) -> Value {
        json!({
            "dnaseSimulationFile": self.description_file.display().to_string(),
            "shuffler": self.shuffler.as_ref().map(|s| s.to_json()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("CTCF-12", "CTCF", 12)]
    #[case("NRF-1-0", "NRF-1", 0)]
    fn test_parse_motif_position(#[case] field: &str, #[case] motif: &str, #[case] pos: usize) {
        assert_eq!(parse_motif_position(field, 1).unwrap(), (motif.to_string(), pos));
    }

    #[rstest]
    #[case("CTCF")]
    #[case("CTCF-x")]
    fn test_parse_motif_position_rejects(#[case] field: &str) {
        assert!(matches!(
            parse_motif_position(field, 3),
            Err(SimdnaIoError::MalformedLine { line: 3, .. })
        ));
    }

    #[rstest]
    fn test_read_description_file() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("dnase.txt");
        std::fs::write(&path, "name\tseq\tmotifs\nr1\tACGTACGT\tm1-2,m2-5\nr2\tTTTT\t\nr3\tGG\n").unwrap();
        let entries = read_dnase_description_file(&path).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0].motifs,
            vec![("m1".to_string(), 2), ("m2".to_string(), 5)]
        );
        assert!(entries[1].motifs.is_empty());
        assert!(entries[2].motifs.is_empty());
    }
}
