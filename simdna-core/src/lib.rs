//! Compositional generation of synthetic DNA sequences.
//!
//! Sequences are assembled from small parts that plug into each other:
//!
//! - background generators produce the base sequence
//! - substring and embeddable generators produce motif instances
//! - position and quantity generators decide where and how many
//! - embedders combine the above and write into the background, tracking
//!   which positions are taken and which operators fired
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use simdna_core::assembly::{EmbedInABackground, GenerateSequenceNTimes, SequenceSetGenerator};
//! use simdna_core::background::ZeroOrderBackgroundGenerator;
//! use simdna_core::embedders::SubstringEmbedder;
//! use simdna_core::substring::FixedSubstringGenerator;
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let single = EmbedInABackground::new(
//!     Box::new(ZeroOrderBackgroundGenerator::with_default_frequencies(50).unwrap()),
//!     vec![Box::new(SubstringEmbedder::new(Box::new(FixedSubstringGenerator::new("GATA"))))],
//! );
//! let mut sequences = GenerateSequenceNTimes::new(Box::new(single), 10);
//! let generated = sequences.generate_sequences(&mut rng).unwrap();
//! assert_eq!(generated.len(), 10);
//! assert!(generated.iter().all(|s| s.seq.contains("GATA")));
//! ```

pub mod assembly;
pub mod background;
pub mod consts;
pub mod embeddable_gen;
pub mod embedders;
pub mod errors;
pub mod labels;
pub mod models;
pub mod motifs;
pub mod mutation;
pub mod position;
pub mod quantity;
pub mod substring;
pub mod utils;

// re-exports
pub use assembly::{SequenceSetGenerator, SingleSequenceGenerator};
pub use errors::SimdnaError;
pub use models::{GeneratedSequence, Pwm};
