use anyhow::{Context, Result};
use clap::ArgMatches;
use rand::RngCore;

use simdna_core::assembly::{EmbedInABackground, GenerateSequenceNTimes};
use simdna_core::background::ZeroOrderBackgroundGenerator;
use simdna_core::embeddable_gen::PairEmbeddableGenerator;
use simdna_core::embedders::EmbeddableEmbedder;
use simdna_core::quantity::{MinMaxWrapper, PoissonQuantityGenerator};
use simdna_core::substring::PwmSampler;
use simdna_io::{PrintOptions, print_sequences};

use crate::shared::{load_motifs, output_path, parse_arg};

pub fn run_variable_spacing(matches: &ArgMatches, rng: &mut dyn RngCore) -> Result<()> {
    let motif_name1 = matches
        .get_one::<String>("motif-name1")
        .context("--motif-name1 is required")?;
    let motif_name2 = matches
        .get_one::<String>("motif-name2")
        .context("--motif-name2 is required")?;
    let seq_length: usize = parse_arg(matches, "seq-length")?;
    let num_seqs: usize = parse_arg(matches, "num-seqs")?;
    let min_spacing: usize = parse_arg(matches, "min-spacing")?;
    let mean_spacing: f64 = parse_arg(matches, "mean-spacing")?;
    let max_spacing: usize = parse_arg(matches, "max-spacing")?;
    let output = output_path(matches)?;

    let motifs = load_motifs(matches)?;
    let separation = MinMaxWrapper::new(
        Box::new(PoissonQuantityGenerator::new(mean_spacing)?),
        Some(min_spacing),
        Some(max_spacing),
    )?;
    let pair = PairEmbeddableGenerator::from_substring_generators(
        Box::new(PwmSampler::from_loaded_motifs(&motifs, motif_name1)?),
        Box::new(PwmSampler::from_loaded_motifs(&motifs, motif_name2)?),
        Box::new(separation),
    );

    let single = EmbedInABackground::new(
        Box::new(ZeroOrderBackgroundGenerator::with_default_frequencies(seq_length)?),
        vec![Box::new(EmbeddableEmbedder::new(Box::new(pair)))],
    )
    .with_name_prefix("synthPos");
    let mut sequences = GenerateSequenceNTimes::new(Box::new(single), num_seqs);

    let written = print_sequences(
        &output,
        &mut sequences,
        rng,
        &PrintOptions::new().with_embeddings().with_fasta(),
    )?;
    tracing::info!("wrote {} sequences to {}", written, output.display());

    Ok(())
}
