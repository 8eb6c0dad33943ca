use clap::{Arg, ArgAction, Command, arg};

use crate::shared::{motif_format_arg, motifs_arg, num_seqs_arg, output_arg, seq_length_arg};

pub const DENSITY_CMD: &str = "density";

pub fn create_density_cli() -> Command {
    Command::new(DENSITY_CMD)
        .about("Embed a random number of instances of each named motif in zero-order backgrounds.")
        .arg(motifs_arg())
        .arg(motif_format_arg())
        .arg(
            Arg::new("motif-names")
                .long("motif-names")
                .required(true)
                .num_args(1..)
                .help("Motifs to embed; each gets its own count"),
        )
        .arg(
            arg!(--"best-hit")
                .action(ArgAction::SetTrue)
                .help("Embed the consensus of each motif instead of sampling it"),
        )
        .arg(
            Arg::new("min-motifs")
                .long("min-motifs")
                .required(false)
                .default_value("0")
                .help("Fewest instances of a motif per sequence"),
        )
        .arg(
            Arg::new("max-motifs")
                .long("max-motifs")
                .required(true)
                .help("Most instances of a motif per sequence"),
        )
        .arg(
            Arg::new("mean-motifs")
                .long("mean-motifs")
                .required(true)
                .help("Poisson mean of the number of instances of a motif"),
        )
        .arg(
            Arg::new("zero-prob")
                .long("zero-prob")
                .required(false)
                .default_value("0")
                .help("Probability of forcing a motif's count to zero"),
        )
        .arg(seq_length_arg())
        .arg(num_seqs_arg())
        .arg(arg!(--prefix <PREFIX>).required(false).help("Prefix for sequence ids"))
        .arg(output_arg())
}
