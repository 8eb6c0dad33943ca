use clap::{Arg, ArgAction, Command, arg};

use crate::shared::{motif_format_arg, motifs_arg, num_seqs_arg, output_arg, seq_length_arg};

pub const GRAMMAR_CMD: &str = "grammar";

pub const ALL_BACKGROUND: &str = "allBackground";
pub const SINGLE_MOTIF1: &str = "singleMotif1";
pub const SINGLE_MOTIF2: &str = "singleMotif2";
pub const TWO_MOTIFS: &str = "twoMotifs";
pub const TWO_MOTIFS_FIXED_SPACING: &str = "twoMotifsFixedSpacing";
pub const TWO_MOTIFS_VARIABLE_SPACING: &str = "twoMotifsVariableSpacing";

pub fn create_grammar_cli() -> Command {
    Command::new(GRAMMAR_CMD)
        .about("Simulate one of several two-motif grammar settings in zero-order backgrounds.")
        .arg(motifs_arg())
        .arg(motif_format_arg())
        .arg(
            Arg::new("motif-name1")
                .long("motif-name1")
                .required(true)
                .help("First motif of the grammar"),
        )
        .arg(
            Arg::new("motif-name2")
                .long("motif-name2")
                .required(true)
                .help("Second motif of the grammar"),
        )
        .arg(
            arg!(--"best-hit")
                .action(ArgAction::SetTrue)
                .help("Embed motif consensus sequences instead of samples"),
        )
        .arg(seq_length_arg())
        .arg(num_seqs_arg())
        .arg(
            Arg::new("generation-setting")
                .long("generation-setting")
                .required(false)
                .default_value(TWO_MOTIFS_FIXED_SPACING)
                .value_parser([
                    ALL_BACKGROUND,
                    SINGLE_MOTIF1,
                    SINGLE_MOTIF2,
                    TWO_MOTIFS,
                    TWO_MOTIFS_FIXED_SPACING,
                    TWO_MOTIFS_VARIABLE_SPACING,
                ])
                .help("Which motifs to embed, and how"),
        )
        .arg(
            Arg::new("fixed-spacing-or-min-spacing")
                .long("fixed-spacing-or-min-spacing")
                .required(false)
                .help("Spacing for the fixed spacing setting, or minimum spacing for the variable one"),
        )
        .arg(
            Arg::new("max-spacing")
                .long("max-spacing")
                .required(false)
                .help("Maximum spacing for the variable spacing setting"),
        )
        .arg(output_arg())
}
