//! Generators of whole embeddables, for use by embedders.

use rand::RngCore;
use serde_json::{Value, json};

use crate::errors::SimdnaError;
use crate::models::{Embeddable, PairEmbeddable, StringEmbeddable};
use crate::quantity::QuantityGenerator;
use crate::substring::SubstringGenerator;

pub trait EmbeddableGenerator {
    fn generate_embeddable(&self, rng: &mut dyn RngCore) -> Result<Embeddable, SimdnaError>;

    fn to_json(&self) -> Value;
}

/// Wraps a substring generator's output in a [`StringEmbeddable`].
pub struct SubstringEmbeddableGenerator {
    substring_generator: Box<dyn SubstringGenerator>,
}

impl SubstringEmbeddableGenerator {
    pub fn new(substring_generator: Box<dyn SubstringGenerator>) -> Self {
        SubstringEmbeddableGenerator {
            substring_generator,
        }
    }
}

impl EmbeddableGenerator for SubstringEmbeddableGenerator {
    fn generate_embeddable(&self, rng: &mut dyn RngCore) -> Result<Embeddable, SimdnaError> {
        let (substring, description) = self.substring_generator.generate_substring(rng)?;
        Ok(StringEmbeddable::new(&substring, &description).into())
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "SubstringEmbeddableGenerator",
            "substringGenerator": self.substring_generator.to_json(),
        })
    }
}

///
/// Builds a [`PairEmbeddable`] from two child generators and a separation
/// generator, calling each once per pair.
///
pub struct PairEmbeddableGenerator {
    embeddable_generator1: Box<dyn EmbeddableGenerator>,
    embeddable_generator2: Box<dyn EmbeddableGenerator>,
    separation_generator: Box<dyn QuantityGenerator>,
    description: String,
    nothing_in_between: bool,
}

impl PairEmbeddableGenerator {
    pub fn new(
        embeddable_generator1: Box<dyn EmbeddableGenerator>,
        embeddable_generator2: Box<dyn EmbeddableGenerator>,
        separation_generator: Box<dyn QuantityGenerator>,
    ) -> Self {
        PairEmbeddableGenerator {
            embeddable_generator1,
            embeddable_generator2,
            separation_generator,
            description: String::new(),
            nothing_in_between: true,
        }
    }

    /// Convenience for the common case of two substring generators.
    pub fn from_substring_generators(
        substring_generator1: Box<dyn SubstringGenerator>,
        substring_generator2: Box<dyn SubstringGenerator>,
        separation_generator: Box<dyn QuantityGenerator>,
    ) -> Self {
        Self::new(
            Box::new(SubstringEmbeddableGenerator::new(substring_generator1)),
            Box::new(SubstringEmbeddableGenerator::new(substring_generator2)),
            separation_generator,
        )
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_nothing_in_between(mut self, nothing_in_between: bool) -> Self {
        self.nothing_in_between = nothing_in_between;
        self
    }
}

impl EmbeddableGenerator for PairEmbeddableGenerator {
    fn generate_embeddable(&self, rng: &mut dyn RngCore) -> Result<Embeddable, SimdnaError> {
        let embeddable1 = self.embeddable_generator1.generate_embeddable(rng)?;
        let embeddable2 = self.embeddable_generator2.generate_embeddable(rng)?;
        let separation = self.separation_generator.generate_quantity(rng);
        Ok(PairEmbeddable::new(embeddable1, embeddable2, separation)
            .with_description(&self.description)
            .with_nothing_in_between(self.nothing_in_between)
            .into())
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "PairEmbeddableGenerator",
            "embeddableGenerator1": self.embeddable_generator1.to_json(),
            "embeddableGenerator2": self.embeddable_generator2.to_json(),
            "separationGenerator": self.separation_generator.to_json(),
            "nothingInBetween": self.nothing_in_between,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    use crate::quantity::{FixedQuantityGenerator, UniformIntegerGenerator};
    use crate::substring::FixedSubstringGenerator;

    #[rstest]
    fn test_substring_embeddable_generator() {
        let mut rng = StdRng::seed_from_u64(0);
        let generator =
            SubstringEmbeddableGenerator::new(Box::new(FixedSubstringGenerator::new("TTGA")));
        let embeddable = generator.generate_embeddable(&mut rng).unwrap();
        assert_eq!(embeddable.to_string(), "TTGA-TTGA");
        assert_eq!(embeddable.len(), 4);
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn test_pair_generator_geometry(#[case] nothing_in_between: bool) {
        let mut rng = StdRng::seed_from_u64(5);
        let generator = PairEmbeddableGenerator::from_substring_generators(
            Box::new(FixedSubstringGenerator::new("AAA")),
            Box::new(FixedSubstringGenerator::new("GG")),
            Box::new(UniformIntegerGenerator::new(2, 6).unwrap()),
        )
        .with_description("spaced")
        .with_nothing_in_between(nothing_in_between);

        for _ in 0..50 {
            let Embeddable::Pair(pair) = generator.generate_embeddable(&mut rng).unwrap() else {
                panic!("expected a pair");
            };
            assert!((2..=6).contains(&pair.separation));
            assert_eq!(pair.len(), 3 + 2 + pair.separation);
            assert_eq!(pair.nothing_in_between, nothing_in_between);
            assert_eq!(pair.description, "spaced");
        }
    }

    #[rstest]
    fn test_pair_generator_json() {
        let generator = PairEmbeddableGenerator::from_substring_generators(
            Box::new(FixedSubstringGenerator::new("A")),
            Box::new(FixedSubstringGenerator::new("C")),
            Box::new(FixedQuantityGenerator::new(3)),
        );
        assert_eq!(
            generator.to_json()["separationGenerator"],
            json!("fixedQuantity-3")
        );
    }
}
