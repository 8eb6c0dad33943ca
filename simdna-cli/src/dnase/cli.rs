use clap::{Arg, Command};

use crate::shared::{motif_format_arg, motifs_arg, output_arg};

pub const DNASE_CMD: &str = "dnase";

pub const DINUCLEOTIDE_SHUFFLE: &str = "dinucleotide";
pub const MONONUCLEOTIDE_SHUFFLE: &str = "mononucleotide";
pub const NO_SHUFFLE: &str = "none";

pub fn create_dnase_cli() -> Command {
    Command::new(DNASE_CMD)
        .about("Plant motifs at listed positions in (optionally shuffled) sequences from a description file.")
        .arg(motifs_arg())
        .arg(motif_format_arg())
        .arg(
            Arg::new("description-file")
                .long("description-file")
                .required(true)
                .help("Tab-separated file with a header and columns name, sequence, motif-pos,..."),
        )
        .arg(
            Arg::new("shuffler")
                .long("shuffler")
                .required(false)
                .default_value(DINUCLEOTIDE_SHUFFLE)
                .value_parser([DINUCLEOTIDE_SHUFFLE, MONONUCLEOTIDE_SHUFFLE, NO_SHUFFLE])
                .help("How to shuffle each described sequence before planting motifs"),
        )
        .arg(output_arg())
}
