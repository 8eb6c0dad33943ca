//! Turning a background model and a list of embedders into sequences.

use rand::RngCore;
use serde_json::{Value, json};

use crate::background::BackgroundGenerator;
use crate::consts::DEFAULT_NAME_PREFIX;
use crate::embedders::Embedder;
use crate::errors::SimdnaError;
use crate::models::{AdditionalInfo, GeneratedSequence, OccupancyTracker};

///
/// Generate one background and run every embedder over it, in order.
///
/// The embedders share one occupancy tracker and one trace, both of which
/// are discarded into the returned [`GeneratedSequence`].
///
pub fn generate_sequence_given_background_and_embedders(
    background_generator: &mut dyn BackgroundGenerator,
    embedders: &[Box<dyn Embedder>],
    sequence_name: &str,
    rng: &mut dyn RngCore,
) -> Result<GeneratedSequence, SimdnaError> {
    let mut info = AdditionalInfo::new();
    let mut background: Vec<char> = background_generator.generate_background(rng)?.chars().collect();
    let mut tracker = OccupancyTracker::new(background.len());
    for embedder in embedders {
        embedder.embed(&mut background, &mut tracker, &mut info, rng)?;
    }
    Ok(GeneratedSequence::new(
        sequence_name.to_string(),
        background.into_iter().collect(),
        tracker.into_embeddings(),
        info,
    ))
}

pub trait SingleSequenceGenerator {
    fn generate_sequence(&mut self, rng: &mut dyn RngCore) -> Result<GeneratedSequence, SimdnaError>;

    fn to_json(&self) -> Value;
}

/// Names sequences `<prefix>0`, `<prefix>1`, ... in generation order.
pub struct EmbedInABackground {
    background_generator: Box<dyn BackgroundGenerator>,
    embedders: Vec<Box<dyn Embedder>>,
    name_prefix: String,
    sequence_counter: usize,
}

impl EmbedInABackground {
    pub fn new(background_generator: Box<dyn BackgroundGenerator>, embedders: Vec<Box<dyn Embedder>>) -> Self {
        EmbedInABackground {
            background_generator,
            embedders,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            sequence_counter: 0,
        }
    }

    pub fn with_name_prefix(mut self, name_prefix: &str) -> Self {
        self.name_prefix = name_prefix.to_string();
        self
    }
}

impl SingleSequenceGenerator for EmbedInABackground {
    fn generate_sequence(&mut self, rng: &mut dyn RngCore) -> Result<GeneratedSequence, SimdnaError> {
        let name = format!("{}{}", self.name_prefix, self.sequence_counter);
        let generated = generate_sequence_given_background_and_embedders(
            self.background_generator.as_mut(),
            &self.embedders,
            &name,
            rng,
        )?;
        self.sequence_counter += 1;
        Ok(generated)
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "EmbedInABackground",
            "namePrefix": self.name_prefix,
            "backgroundGenerator": self.background_generator.to_json(),
            "embedders": self.embedders.iter().map(|e| e.to_json()).collect::<Vec<_>>(),
        })
    }
}

pub trait SequenceSetGenerator {
    fn generate_sequences(&mut self, rng: &mut dyn RngCore) -> Result<Vec<GeneratedSequence>, SimdnaError>;

    fn to_json(&self) -> Value;
}

pub struct GenerateSequenceNTimes {
    generator: Box<dyn SingleSequenceGenerator>,
    num_seqs: usize,
}

impl GenerateSequenceNTimes {
    pub fn new(generator: Box<dyn SingleSequenceGenerator>, num_seqs: usize) -> Self {
        GenerateSequenceNTimes { generator, num_seqs }
    }
}

impl SequenceSetGenerator for GenerateSequenceNTimes {
    fn generate_sequences(&mut self, rng: &mut dyn RngCore) -> Result<Vec<GeneratedSequence>, SimdnaError> {
        (0..self.num_seqs)
            .map(|_| self.generator.generate_sequence(rng))
            .collect()
    }

    fn to_json(&self) -> Value {
        json!({
            "numSeq": self.num_seqs,
            "singleSetGenerator": self.generator.to_json(),
        })
    }
}

/// Concatenates the output of several set generators.
pub struct ChainSequenceSetGenerators {
    generators: Vec<Box<dyn SequenceSetGenerator>>,
}

impl ChainSequenceSetGenerators {
    pub fn new(generators: Vec<Box<dyn SequenceSetGenerator>>) -> Self {
        ChainSequenceSetGenerators { generators }
    }
}

impl SequenceSetGenerator for ChainSequenceSetGenerators {
    fn generate_sequences(&mut self, rng: &mut dyn RngCore) -> Result<Vec<GeneratedSequence>, SimdnaError> {
        let mut all = Vec::new();
        for generator in self.generators.iter_mut() {
            all.extend(generator.generate_sequences(rng)?);
        }
        Ok(all)
    }

    fn to_json(&self) -> Value {
        json!({
            "generators": self.generators.iter().map(|g| g.to_json()).collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::{fixture, rstest};

    use crate::background::{FixedBackgroundGenerator, ZeroOrderBackgroundGenerator};
    use crate::embedders::SubstringEmbedder;
    use crate::position::FixedPositionGenerator;
    use crate::substring::FixedSubstringGenerator;

    #[fixture]
    fn rng() -> StdRng {
        StdRng::seed_from_u64(8)
    }

    fn gata_at(pos: usize) -> Box<dyn Embedder> {
        Box::new(
            SubstringEmbedder::new(Box::new(FixedSubstringGenerator::new("GATA")))
                .with_position_generator(Box::new(FixedPositionGenerator::new(pos)))
                .with_name("gata"),
        )
    }

    #[rstest]
    fn test_single_assembly(mut rng: StdRng) {
        let mut background = FixedBackgroundGenerator::new("CCCCCCCCCC");
        let generated = generate_sequence_given_background_and_embedders(
            &mut background,
            &[gata_at(2)],
            "seq",
            &mut rng,
        )
        .unwrap();
        assert_eq!(generated.seq_name, "seq");
        assert_eq!(generated.seq, "CCGATACCCC");
        assert_eq!(generated.embeddings.len(), 1);
        assert!(generated.additional_info.is_in_trace("gata"));
    }

    #[rstest]
    fn test_names_count_up(mut rng: StdRng) {
        let single = EmbedInABackground::new(
            Box::new(ZeroOrderBackgroundGenerator::with_default_frequencies(20).unwrap()),
            vec![gata_at(0)],
        );
        let mut set = GenerateSequenceNTimes::new(Box::new(single), 3);
        let names: Vec<String> = set
            .generate_sequences(&mut rng)
            .unwrap()
            .into_iter()
            .map(|s| s.seq_name)
            .collect();
        assert_eq!(names, vec!["synth0", "synth1", "synth2"]);
    }

    #[rstest]
    fn test_chain(mut rng: StdRng) {
        let positives = GenerateSequenceNTimes::new(
            Box::new(
                EmbedInABackground::new(Box::new(FixedBackgroundGenerator::new("AAAAAA")), vec![gata_at(1)])
                    .with_name_prefix("pos"),
            ),
            2,
        );
        let negatives = GenerateSequenceNTimes::new(
            Box::new(
                EmbedInABackground::new(Box::new(FixedBackgroundGenerator::new("TTTTTT")), vec![])
                    .with_name_prefix("neg"),
            ),
            1,
        );
        let mut chain = ChainSequenceSetGenerators::new(vec![Box::new(positives), Box::new(negatives)]);
        let generated = chain.generate_sequences(&mut rng).unwrap();
        let rows: Vec<(String, String)> = generated
            .into_iter()
            .map(|s| (s.seq_name, s.seq))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("pos0".to_string(), "AGATAA".to_string()),
                ("pos1".to_string(), "AGATAA".to_string()),
                ("neg0".to_string(), "TTTTTT".to_string()),
            ]
        );
        assert_eq!(chain.to_json()["generators"][1]["numSeq"], json!(1));
    }

    #[rstest]
    fn test_errors_propagate(mut rng: StdRng) {
        let mut background = FixedBackgroundGenerator::new("CCC");
        let result = generate_sequence_given_background_and_embedders(
            &mut background,
            &[gata_at(0)],
            "short",
            &mut rng,
        );
        assert!(matches!(result, Err(SimdnaError::PositionOutOfRange { .. })));
    }
}
