//! # Input/Output for simdna.
//!
//! Writing generated sequence sets to disk as simdata files (with their
//! FASTA and JSON companions) and reading them back, loading motif
//! collections from ENCODE and HOMER motif files, and running simulations
//! described by a tab-separated description file. Any path ending in `.gz`
//! is read or written gzip-compressed.
//!
pub mod dnase;
pub mod error;
pub mod motifs;
pub mod simdata;
pub mod utils;

// re-expose core functions
pub use dnase::*;
pub use error::*;
pub use motifs::*;
pub use simdata::*;
