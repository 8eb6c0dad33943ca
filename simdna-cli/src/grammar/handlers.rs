use anyhow::{Context, Result};
use clap::ArgMatches;
use rand::RngCore;

use simdna_core::assembly::{EmbedInABackground, GenerateSequenceNTimes};
use simdna_core::background::ZeroOrderBackgroundGenerator;
use simdna_core::embeddable_gen::PairEmbeddableGenerator;
use simdna_core::embedders::{EmbeddableEmbedder, Embedder, SubstringEmbedder};
use simdna_core::motifs::LoadedMotifs;
use simdna_core::quantity::{FixedQuantityGenerator, QuantityGenerator, UniformIntegerGenerator};
use simdna_io::{PrintOptions, print_sequences};

use super::cli::{
    ALL_BACKGROUND, SINGLE_MOTIF1, SINGLE_MOTIF2, TWO_MOTIFS, TWO_MOTIFS_FIXED_SPACING,
    TWO_MOTIFS_VARIABLE_SPACING,
};
use crate::shared::{load_motifs, motif_generator, output_path, parse_arg, parse_optional_arg};

const NEGATIVE_PREFIX: &str = "synthNeg";
const POSITIVE_PREFIX: &str = "synthPos";

/// Settings without a grammar-bearing embedding are the negatives.
fn name_prefix(setting: &str) -> &'static str {
    match setting {
        ALL_BACKGROUND | TWO_MOTIFS => NEGATIVE_PREFIX,
        _ => POSITIVE_PREFIX,
    }
}

fn separation_generator(
    setting: &str,
    min_spacing: Option<usize>,
    max_spacing: Option<usize>,
) -> Result<Box<dyn QuantityGenerator>> {
    let min_spacing = min_spacing.with_context(|| {
        format!("--fixed-spacing-or-min-spacing is required for {}", setting)
    })?;
    if setting == TWO_MOTIFS_FIXED_SPACING {
        return Ok(Box::new(FixedQuantityGenerator::new(min_spacing)));
    }
    let max_spacing = max_spacing
        .with_context(|| format!("--max-spacing is required for {}", setting))?;
    Ok(Box::new(UniformIntegerGenerator::new(min_spacing, max_spacing)?))
}

fn grammar_embedders(
    setting: &str,
    motifs: &LoadedMotifs,
    motif_name1: &str,
    motif_name2: &str,
    best_hit: bool,
    min_spacing: Option<usize>,
    max_spacing: Option<usize>,
) -> Result<Vec<Box<dyn Embedder>>> {
    let single = |name: &str| -> Result<Box<dyn Embedder>> {
        Ok(Box::new(SubstringEmbedder::new(motif_generator(motifs, name, best_hit)?)))
    };

    let embedders = match setting {
        ALL_BACKGROUND => vec![],
        SINGLE_MOTIF1 => vec![single(motif_name1)?],
        SINGLE_MOTIF2 => vec![single(motif_name2)?],
        TWO_MOTIFS => vec![single(motif_name1)?, single(motif_name2)?],
        TWO_MOTIFS_FIXED_SPACING | TWO_MOTIFS_VARIABLE_SPACING => {
            let pair = PairEmbeddableGenerator::from_substring_generators(
                motif_generator(motifs, motif_name1, best_hit)?,
                motif_generator(motifs, motif_name2, best_hit)?,
                separation_generator(setting, min_spacing, max_spacing)?,
            );
            vec![Box::new(EmbeddableEmbedder::new(Box::new(pair))) as Box<dyn Embedder>]
        }
        other => anyhow::bail!("Unsupported generation setting: {}", other),
    };
    Ok(embedders)
}

pub fn run_grammar(matches: &ArgMatches, rng: &mut dyn RngCore) -> Result<()> {
    let motif_name1 = matches
        .get_one::<String>("motif-name1")
        .context("--motif-name1 is required")?;
    let motif_name2 = matches
        .get_one::<String>("motif-name2")
        .context("--motif-name2 is required")?;
    let best_hit = matches.get_flag("best-hit");
    let setting = matches
        .get_one::<String>("generation-setting")
        .map(String::as_str)
        .unwrap_or(TWO_MOTIFS_FIXED_SPACING);
    let seq_length: usize = parse_arg(matches, "seq-length")?;
    let num_seqs: usize = parse_arg(matches, "num-seqs")?;
    let min_spacing: Option<usize> = parse_optional_arg(matches, "fixed-spacing-or-min-spacing")?;
    let max_spacing: Option<usize> = parse_optional_arg(matches, "max-spacing")?;
    let output = output_path(matches)?;

    let motifs = load_motifs(matches)?;
    let embedders = grammar_embedders(
        setting,
        &motifs,
        motif_name1,
        motif_name2,
        best_hit,
        min_spacing,
        max_spacing,
    )?;

    let single = EmbedInABackground::new(
        Box::new(ZeroOrderBackgroundGenerator::with_default_frequencies(seq_length)?),
        embedders,
    )
    .with_name_prefix(name_prefix(setting));
    let mut sequences = GenerateSequenceNTimes::new(Box::new(single), num_seqs);

    let written = print_sequences(
        &output,
        &mut sequences,
        rng,
        &PrintOptions::new().with_embeddings(),
    )?;
    tracing::info!("wrote {} {} sequences to {}", written, setting, output.display());

    Ok(())
}
