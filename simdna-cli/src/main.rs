mod density;
mod dnase;
mod empty_background;
mod grammar;
mod shared;
mod variable_spacing;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, arg};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "simdna";
    pub const BIN_NAME: &str = "simdna";
    pub const DEFAULT_LOG_LEVEL: &str = "info";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Simulate synthetic DNA sequences with known embedded motifs.")
        .subcommand_required(true)
        .arg(
            arg!(--seed <SEED>)
                .global(true)
                .help("Seed for the random number generator (default: seeded from the OS)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .conflicts_with("quiet")
                .help("Log debug messages"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Only log errors"),
        )
        .subcommand(density::cli::create_density_cli())
        .subcommand(grammar::cli::create_grammar_cli())
        .subcommand(variable_spacing::cli::create_variable_spacing_cli())
        .subcommand(empty_background::cli::create_empty_background_cli())
        .subcommand(dnase::cli::create_dnase_cli())
}

fn init_logging(matches: &ArgMatches) {
    let level = if matches.get_flag("verbose") {
        "debug"
    } else if matches.get_flag("quiet") {
        "error"
    } else {
        consts::DEFAULT_LOG_LEVEL
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_rng(matches: &ArgMatches) -> Result<StdRng> {
    match matches.get_one::<String>("seed") {
        Some(seed) => {
            let seed: u64 = seed.parse().context("--seed must be a non-negative integer")?;
            Ok(StdRng::seed_from_u64(seed))
        }
        None => Ok(StdRng::from_os_rng()),
    }
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(&matches);
    let mut rng = build_rng(&matches)?;

    match matches.subcommand() {
        //
        // DENSITY
        //
        Some((density::cli::DENSITY_CMD, matches)) => {
            density::handlers::run_density(matches, &mut rng)?;
        }

        //
        // MOTIF GRAMMAR
        //
        Some((grammar::cli::GRAMMAR_CMD, matches)) => {
            grammar::handlers::run_grammar(matches, &mut rng)?;
        }

        //
        // VARIABLE SPACING
        //
        Some((variable_spacing::cli::VARIABLE_SPACING_CMD, matches)) => {
            variable_spacing::handlers::run_variable_spacing(matches, &mut rng)?;
        }

        //
        // EMPTY BACKGROUND
        //
        Some((empty_background::cli::EMPTY_BACKGROUND_CMD, matches)) => {
            empty_background::handlers::run_empty_background(matches, &mut rng)?;
        }

        //
        // DNASE
        //
        Some((dnase::cli::DNASE_CMD, matches)) => {
            dnase::handlers::run_dnase(matches, &mut rng)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
