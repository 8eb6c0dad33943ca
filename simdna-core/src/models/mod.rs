pub mod distribution;
pub mod embeddable;
pub mod embedding;
pub mod pwm;
pub mod sequence;
pub mod tracker;

// re-export for cleaner imports
pub use self::distribution::DiscreteDistribution;
pub use self::embeddable::{Embeddable, PairEmbeddable, StringEmbeddable};
pub use self::embedding::{Embedding, embeddings_from_string, embeddings_to_string};
pub use self::pwm::Pwm;
pub use self::sequence::{AdditionalInfo, GeneratedSequence};
pub use self::tracker::OccupancyTracker;
