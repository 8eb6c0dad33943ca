pub const DEFAULT_LETTERS: [char; 4] = ['A', 'C', 'G', 'T'];

pub const DEFAULT_PSEUDOCOUNT_PROB: f64 = 0.001;
pub const DEFAULT_NAME_PREFIX: &str = "synth";
pub const DEFAULT_REVERSE_COMPLEMENT_PROB: f64 = 0.5;
pub const REVERSE_COMPLEMENT_MARKER: &str = "revComp";

/// How many failed attempts a retry loop makes between two warnings.
pub const RETRY_WARNING_INTERVAL: usize = 10;
pub const MAX_MIN_SCORE_TRIES: usize = 50;

pub const ROW_SUM_TOLERANCE: f64 = 1e-4;
pub const DISTRIBUTION_SUM_TOLERANCE: f64 = 1e-5;
pub const DINUC_SUM_TOLERANCE: f64 = 1e-7;

pub const DEFAULT_BACKGROUND_FREQ: [(char, f64); 4] =
    [('A', 0.3), ('C', 0.2), ('G', 0.2), ('T', 0.3)];

pub const DEFAULT_DINUC_FREQ: [(&str, f64); 16] = [
    ("AA", 0.095),
    ("AC", 0.050),
    ("AG", 0.071),
    ("AT", 0.075),
    ("CA", 0.073),
    ("CC", 0.054),
    ("CG", 0.010),
    ("CT", 0.072),
    ("GA", 0.060),
    ("GC", 0.044),
    ("GG", 0.054),
    ("GT", 0.050),
    ("TA", 0.064),
    ("TC", 0.060),
    ("TG", 0.073),
    ("TT", 0.095),
];
