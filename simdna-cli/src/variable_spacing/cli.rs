use clap::{Arg, Command};

use crate::shared::{motif_format_arg, motifs_arg, num_seqs_arg, output_arg, seq_length_arg};

pub const VARIABLE_SPACING_CMD: &str = "variable-spacing";

pub fn create_variable_spacing_cli() -> Command {
    Command::new(VARIABLE_SPACING_CMD)
        .about("Embed two motifs as a pair whose spacing follows a bounded Poisson distribution.")
        .arg(motifs_arg())
        .arg(motif_format_arg())
        .arg(Arg::new("motif-name1").long("motif-name1").required(true).help("Left motif of the pair"))
        .arg(Arg::new("motif-name2").long("motif-name2").required(true).help("Right motif of the pair"))
        .arg(seq_length_arg())
        .arg(num_seqs_arg())
        .arg(Arg::new("min-spacing").long("min-spacing").required(true).help("Smallest gap between the motifs"))
        .arg(Arg::new("mean-spacing").long("mean-spacing").required(true).help("Poisson mean of the gap"))
        .arg(Arg::new("max-spacing").long("max-spacing").required(true).help("Largest gap between the motifs"))
        .arg(output_arg())
}
