use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimdnaError {
    #[error("PWM {name} expects rows of length {expected} but was given a row of length {found}")]
    RowLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("PWM {0} is already finalized; no more rows can be added")]
    PwmAlreadyFinalized(String),

    #[error("PWM {0} has no rows")]
    EmptyPwm(String),

    #[error("Pseudocount probability must lie in [0, 1), got {0}")]
    InvalidPseudocount(f64),

    #[error("Row {row} of PWM {name} sums to {sum} after smoothing")]
    RowNotNormalized { name: String, row: usize, sum: f64 },

    #[error("Please call finalize on PWM {0} before sampling or reading it")]
    PwmNotFinalized(String),

    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),

    #[error("Invalid dinucleotide table: {0}")]
    InvalidDinucleotideTable(String),

    #[error("Number of embedders to sample came up as {requested} but total number of embedders is {available}")]
    NotEnoughEmbedders { requested: usize, available: usize },

    #[error("Fixed position {pos} cannot hold an item of length {item_len} in a background of length {background_len}")]
    PositionOutOfRange {
        pos: usize,
        item_len: usize,
        background_len: usize,
    },

    #[error("The background length should be at least as long as the central region; is {background_len} and {central_bp} respectively")]
    BackgroundTooShort {
        background_len: usize,
        central_bp: usize,
    },

    #[error("Cannot place an item of length {item_len} in a region of length {region_len}")]
    ItemTooLong { item_len: usize, region_len: usize },

    #[error("Could not sample {name} with a score of at least {min_score} after {tries} tries")]
    MinScoreNotReached {
        name: String,
        min_score: f64,
        tries: usize,
    },

    #[error("Unknown motif: {0}")]
    UnknownMotif(String),

    #[error("Invalid symbol {0:?} in sequence")]
    InvalidSymbol(char),

    #[error("Error parsing embedding: {0}")]
    EmbeddingParseError(String),

    #[error("Invalid mutation: {0}")]
    InvalidMutation(String),

    #[error("Background corpus is empty")]
    EmptyCorpus,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
