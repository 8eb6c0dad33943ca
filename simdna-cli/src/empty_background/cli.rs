use clap::Command;

use crate::shared::{num_seqs_arg, output_arg, seq_length_arg};

pub const EMPTY_BACKGROUND_CMD: &str = "empty-background";

pub fn create_empty_background_cli() -> Command {
    Command::new(EMPTY_BACKGROUND_CMD)
        .about("Generate zero-order background sequences with nothing embedded.")
        .arg(seq_length_arg())
        .arg(num_seqs_arg())
        .arg(output_arg())
}
