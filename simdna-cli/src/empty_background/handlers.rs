use anyhow::Result;
use clap::ArgMatches;
use rand::RngCore;

use simdna_core::assembly::{EmbedInABackground, GenerateSequenceNTimes};
use simdna_core::background::ZeroOrderBackgroundGenerator;
use simdna_io::{PrintOptions, print_sequences};

use crate::shared::{output_path, parse_arg};

pub fn run_empty_background(matches: &ArgMatches, rng: &mut dyn RngCore) -> Result<()> {
    let seq_length: usize = parse_arg(matches, "seq-length")?;
    let num_seqs: usize = parse_arg(matches, "num-seqs")?;
    let output = output_path(matches)?;

    let single = EmbedInABackground::new(
        Box::new(ZeroOrderBackgroundGenerator::with_default_frequencies(seq_length)?),
        vec![],
    );
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
