//! Argument handling shared by the simulation subcommands.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, arg};
use simdna_core::consts::DEFAULT_PSEUDOCOUNT_PROB;
use simdna_core::motifs::LoadedMotifs;
use simdna_core::substring::{BestHitPwm, PwmSampler, SubstringGenerator};
use simdna_io::{load_encode_motifs, load_homer_motifs};

pub const ENCODE_FORMAT: &str = "encode";
pub const HOMER_FORMAT: &str = "homer";

pub fn motifs_arg() -> Arg {
    arg!(--motifs <MOTIFS>)
        .required(true)
        .help("Path to a motif file, optionally gzip'd")
}

pub fn motif_format_arg() -> Arg {
    Arg::new("motif-format")
        .long("motif-format")
        .required(false)
        .default_value(ENCODE_FORMAT)
        .value_parser([ENCODE_FORMAT, HOMER_FORMAT])
        .help("Format of the motif file")
}

pub fn seq_length_arg() -> Arg {
    Arg::new("seq-length")
        .long("seq-length")
        .required(true)
        .help("Length of every generated sequence")
}

pub fn num_seqs_arg() -> Arg {
    Arg::new("num-seqs")
        .long("num-seqs")
        .required(true)
        .help("Number of sequences to generate")
}

pub fn output_arg() -> Arg {
    arg!(--output <OUTPUT>)
        .required(true)
        .help("Output simdata path; a .gz suffix compresses it")
}

/// Parse a typed value out of a string argument.
pub fn parse_arg<T>(matches: &ArgMatches, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = matches
        .get_one::<String>(name)
        .with_context(|| format!("--{} is required", name))?;
    raw.parse::<T>()
        .with_context(|| format!("--{} could not be parsed from {:?}", name, raw))
}

/// Like [`parse_arg`], for arguments that may be left out.
pub fn parse_optional_arg<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match matches.get_one::<String>(name) {
        Some(_) => parse_arg(matches, name).map(Some),
        None => Ok(None),
    }
}

pub fn output_path(matches: &ArgMatches) -> Result<PathBuf> {
    let output = matches
        .get_one::<String>("output")
        .context("--output is required")?;
    Ok(PathBuf::from(output))
}

/// Load the motif file named by `--motifs` in the format given by `--motif-format`.
pub fn load_motifs(matches: &ArgMatches) -> Result<LoadedMotifs> {
    let path = matches
        .get_one::<String>("motifs")
        .context("--motifs is required")?;
    let path = Path::new(path);
    let format = matches
        .get_one::<String>("motif-format")
        .map(String::as_str)
        .unwrap_or(ENCODE_FORMAT);

    let motifs = match format {
        HOMER_FORMAT => load_homer_motifs(path, DEFAULT_PSEUDOCOUNT_PROB),
        _ => load_encode_motifs(path, DEFAULT_PSEUDOCOUNT_PROB),
    }
    .with_context(|| format!("Failed to load motifs from {}", path.display()))?;

    tracing::info!("loaded {} motifs from {}", motifs.len(), path.display());
    Ok(motifs)
}

/// Either the consensus of a motif or a fresh sample from it.
pub fn motif_generator(
    motifs: &LoadedMotifs,
    motif_name: &str,
    best_hit: bool,
) -> Result<Box<dyn SubstringGenerator>> {
    let generator: Box<dyn SubstringGenerator> = if best_hit {
        Box::new(BestHitPwm::from_loaded_motifs(motifs, motif_name)?)
    } else {
        Box::new(PwmSampler::from_loaded_motifs(motifs, motif_name)?)
    };
    Ok(generator)
}
