use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use rand::RngCore;

use simdna_core::background::{DinucleotideShuffler, MononucleotideShuffler, Shuffler};
use simdna_io::{DnaseSimulation, PrintOptions, print_sequences};

use super::cli::{DINUCLEOTIDE_SHUFFLE, MONONUCLEOTIDE_SHUFFLE};
use crate::shared::{load_motifs, output_path};

fn shuffler_from_name(name: &str) -> Option<Box<dyn Shuffler>> {
    match name {
        DINUCLEOTIDE_SHUFFLE => Some(Box::new(DinucleotideShuffler)),
        MONONUCLEOTIDE_SHUFFLE => Some(Box::new(MononucleotideShuffler)),
        _ => None,
    }
}

pub fn run_dnase(matches: &ArgMatches, rng: &mut dyn RngCore) -> Result<()> {
    let description_file = matches
        .get_one::<String>("description-file")
        .context("--description-file is required")?;
    let shuffler = matches
        .get_one::<String>("shuffler")
        .and_then(|name| shuffler_from_name(name));
    let output = output_path(matches)?;

    let motifs = load_motifs(matches)?;
    let mut simulation = DnaseSimulation::new(Path::new(description_file), motifs, shuffler)
        .with_context(|| format!("Failed to read description file {}", description_file))?;

    let written = print_sequences(
        &output,
        &mut simulation,
        rng,
        &PrintOptions::new().with_embeddings(),
    )?;
    tracing::info!("wrote {} sequences to {}", written, output.display());

    Ok(())
}
