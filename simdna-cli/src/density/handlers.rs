use anyhow::Result;
use clap::ArgMatches;
use rand::RngCore;

use simdna_core::assembly::{EmbedInABackground, GenerateSequenceNTimes};
use simdna_core::background::ZeroOrderBackgroundGenerator;
use simdna_core::embedders::{Embedder, RepeatedEmbedder, SubstringEmbedder};
use simdna_core::quantity::{MinMaxWrapper, PoissonQuantityGenerator, ZeroInflater};
use simdna_io::{PrintOptions, print_sequences};

use crate::shared::{load_motifs, motif_generator, output_path, parse_arg};

pub fn run_density(matches: &ArgMatches, rng: &mut dyn RngCore) -> Result<()> {
    let motif_names: Vec<&String> = matches
        .get_many::<String>("motif-names")
        .map(|names| names.collect())
        .unwrap_or_default();
    let best_hit = matches.get_flag("best-hit");
    let min_motifs: usize = parse_arg(matches, "min-motifs")?;
    let max_motifs: usize = parse_arg(matches, "max-motifs")?;
    let mean_motifs: f64 = parse_arg(matches, "mean-motifs")?;
    let zero_prob: f64 = parse_arg(matches, "zero-prob")?;
    let seq_length: usize = parse_arg(matches, "seq-length")?;
    let num_seqs: usize = parse_arg(matches, "num-seqs")?;
    let prefix = matches.get_one::<String>("prefix");
    let output = output_path(matches)?;

    let motifs = load_motifs(matches)?;

    let mut embedders: Vec<Box<dyn Embedder>> = Vec::with_capacity(motif_names.len());
    for name in motif_names {
        let count = ZeroInflater::new(
            Box::new(MinMaxWrapper::new(
                Box::new(PoissonQuantityGenerator::new(mean_motifs)?),
                Some(min_motifs),
                Some(max_motifs),
            )?),
            zero_prob,
        )?;
        embedders.push(Box::new(
            RepeatedEmbedder::new(
                Box::new(SubstringEmbedder::new(motif_generator(&motifs, name, best_hit)?)),
                Box::new(count),
            )
            .with_name(name),
        ));
    }

    let single = EmbedInABackground::new(
        Box::new(ZeroOrderBackgroundGenerator::with_default_frequencies(seq_length)?),
        embedders,
    );
    let mut sequences = GenerateSequenceNTimes::new(Box::new(single), num_seqs);

    let mut options = PrintOptions::new().with_embeddings().with_fasta();
    if let Some(prefix) = prefix {
        options = options.with_prefix(prefix);
    }
    let written = print_sequences(&output, &mut sequences, rng, &options)?;
    tracing::info!("wrote {} sequences to {}", written, output.display());

    Ok(())
}
