//! Strategies that choose what to embed and where, then commit it.

use rand::RngCore;
use serde_json::{Value, json};
use tracing::warn;

use crate::consts::RETRY_WARNING_INTERVAL;
use crate::embeddable_gen::{EmbeddableGenerator, SubstringEmbeddableGenerator};
use crate::errors::SimdnaError;
use crate::models::{AdditionalInfo, OccupancyTracker};
use crate::position::{PositionGenerator, UniformPositionGenerator};
use crate::quantity::QuantityGenerator;
use crate::substring::SubstringGenerator;
use crate::utils::{sample_indices_without_replacement, uniform};

pub trait Embedder {
    fn name(&self) -> &str;

    /// Place things into `background` and commit them to `tracker`.
    fn embed_into(
        &self,
        background: &mut [char],
        tracker: &mut OccupancyTracker,
        info: &mut AdditionalInfo,
        rng: &mut dyn RngCore,
    ) -> Result<(), SimdnaError>;

    fn to_json(&self) -> Value;

    /// Record this embedder in the trace, then run it.
    fn embed(
        &self,
        background: &mut [char],
        tracker: &mut OccupancyTracker,
        info: &mut AdditionalInfo,
        rng: &mut dyn RngCore,
    ) -> Result<(), SimdnaError> {
        info.update_trace(self.name());
        self.embed_into(background, tracker, info, rng)
    }
}

///
/// Embeds one generated embeddable at a sampled free position.
///
/// Positions are redrawn until the embeddable fits. The loop has no upper
/// bound; a warning is logged every [`RETRY_WARNING_INTERVAL`] attempts, so
/// a saturated background shows up in the logs rather than as an error.
///
pub struct EmbeddableEmbedder {
    name: String,
    embeddable_generator: Box<dyn EmbeddableGenerator>,
    position_generator: Box<dyn PositionGenerator>,
}

impl EmbeddableEmbedder {
    pub fn new(embeddable_generator: Box<dyn EmbeddableGenerator>) -> Self {
        EmbeddableEmbedder {
            name: "EmbeddableEmbedder".to_string(),
            embeddable_generator,
            position_generator: Box::new(UniformPositionGenerator::new()),
        }
    }

    pub fn with_position_generator(mut self, position_generator: Box<dyn PositionGenerator>) -> Self {
        self.position_generator = position_generator;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl Embedder for EmbeddableEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn embed_into(
        &self,
        background: &mut [char],
        tracker: &mut OccupancyTracker,
        info: &mut AdditionalInfo,
        rng: &mut dyn RngCore,
    ) -> Result<(), SimdnaError> {
        let embeddable = self.embeddable_generator.generate_embeddable(rng)?;
        let mut tries = 0;
        loop {
            tries += 1;
            let start = self.position_generator.generate_pos(
                background.len(),
                embeddable.len(),
                Some(&mut *info),
                rng,
            )?;
            if embeddable.can_embed(tracker, start) {
                embeddable.embed_in_background(tracker, background, start);
                return Ok(());
            }
            if tries % RETRY_WARNING_INTERVAL == 0 {
                warn!(
                    "made {} attempts at trying to embed {} in region of length {} with {} occupied sites",
                    tries,
                    embeddable,
                    tracker.total_pos(),
                    tracker.num_occupied_pos()
                );
            }
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "EmbeddableEmbedder",
            "embeddableGenerator": self.embeddable_generator.to_json(),
            "positionGenerator": self.position_generator.to_json(),
        })
    }
}

/// [`EmbeddableEmbedder`] over the output of a substring generator.
pub struct SubstringEmbedder {
    inner: EmbeddableEmbedder,
}

impl SubstringEmbedder {
    pub fn new(substring_generator: Box<dyn SubstringGenerator>) -> Self {
        SubstringEmbedder {
            inner: EmbeddableEmbedder::new(Box::new(SubstringEmbeddableGenerator::new(
                substring_generator,
            )))
            .with_name("SubstringEmbedder"),
        }
    }

    pub fn with_position_generator(mut self, position_generator: Box<dyn PositionGenerator>) -> Self {
        self.inner = self.inner.with_position_generator(position_generator);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.inner = self.inner.with_name(name);
        self
    }
}

impl Embedder for SubstringEmbedder {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn embed_into(
        &self,
        background: &mut [char],
        tracker: &mut OccupancyTracker,
        info: &mut AdditionalInfo,
        rng: &mut dyn RngCore,
    ) -> Result<(), SimdnaError> {
        self.inner.embed_into(background, tracker, info, rng)
    }

    fn to_json(&self) -> Value {
        self.inner.to_json()
    }
}

/// Runs the child embedder a drawn number of times.
pub struct RepeatedEmbedder {
    name: String,
    embedder: Box<dyn Embedder>,
    quantity_generator: Box<dyn QuantityGenerator>,
}

impl RepeatedEmbedder {
    pub fn new(embedder: Box<dyn Embedder>, quantity_generator: Box<dyn QuantityGenerator>) -> Self {
        RepeatedEmbedder {
            name: "RepeatedEmbedder".to_string(),
            embedder,
            quantity_generator,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl Embedder for RepeatedEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn embed_into(
        &self,
        background: &mut [char],
        tracker: &mut OccupancyTracker,
        info: &mut AdditionalInfo,
        rng: &mut dyn RngCore,
    ) -> Result<(), SimdnaError> {
        let quantity = self.quantity_generator.generate_quantity(rng);
        for _ in 0..quantity {
            self.embedder.embed(background, tracker, info, rng)?;
        }
        Ok(())
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "RepeatedEmbedder",
            "embedder": self.embedder.to_json(),
            "quantityGenerator": self.quantity_generator.to_json(),
        })
    }
}

/// Runs a random subset of the children, of drawn size, in random order.
pub struct RandomSubsetOfEmbedders {
    name: String,
    quantity_generator: Box<dyn QuantityGenerator>,
    embedders: Vec<Box<dyn Embedder>>,
}

impl RandomSubsetOfEmbedders {
    pub fn new(quantity_generator: Box<dyn QuantityGenerator>, embedders: Vec<Box<dyn Embedder>>) -> Self {
        RandomSubsetOfEmbedders {
            name: "RandomSubsetOfEmbedders".to_string(),
            quantity_generator,
            embedders,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl Embedder for RandomSubsetOfEmbedders {
    fn name(&self) -> &str {
        &self.name
    }

    fn embed_into(
        &self,
        background: &mut [char],
        tracker: &mut OccupancyTracker,
        info: &mut AdditionalInfo,
        rng: &mut dyn RngCore,
    ) -> Result<(), SimdnaError> {
        let requested = self.quantity_generator.generate_quantity(rng);
        if requested > self.embedders.len() {
            return Err(SimdnaError::NotEnoughEmbedders {
                requested,
                available: self.embedders.len(),
            });
        }
        for idx in sample_indices_without_replacement(self.embedders.len(), requested, rng) {
            self.embedders[idx].embed(background, tracker, info, rng)?;
        }
        Ok(())
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "RandomSubsetOfEmbedders",
            "quantityGenerator": self.quantity_generator.to_json(),
            "setOfEmbedders": self.embedders.iter().map(|e| e.to_json()).collect::<Vec<_>>(),
        })
    }
}

/// Runs exactly one of two children; the first with probability `prob_of_first`.
pub struct XOREmbedder {
    name: String,
    embedder1: Box<dyn Embedder>,
    embedder2: Box<dyn Embedder>,
    prob_of_first: f64,
}

impl XOREmbedder {
    pub fn new(
        embedder1: Box<dyn Embedder>,
        embedder2: Box<dyn Embedder>,
        prob_of_first: f64,
    ) -> Result<Self, SimdnaError> {
        if !(0.0..=1.0).contains(&prob_of_first) {
            return Err(SimdnaError::InvalidParameter(format!(
                "probability of the first embedder must lie in [0, 1], got {}",
                prob_of_first
            )));
        }
        Ok(XOREmbedder {
            name: "XOREmbedder".to_string(),
            embedder1,
            embedder2,
            prob_of_first,
        })
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl Embedder for XOREmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn embed_into(
        &self,
        background: &mut [char],
        tracker: &mut OccupancyTracker,
        info: &mut AdditionalInfo,
        rng: &mut dyn RngCore,
    ) -> Result<(), SimdnaError> {
        let embedder = if uniform(rng) < self.prob_of_first {
            &self.embedder1
        } else {
            &self.embedder2
        };
        embedder.embed(background, tracker, info, rng)
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "XOREmbedder",
            "embedder1": self.embedder1.to_json(),
            "embedder2": self.embedder2.to_json(),
            "probOfFirst": self.prob_of_first,
        })
    }
}

/// Runs every child in order.
pub struct AllEmbedders {
    name: String,
    embedders: Vec<Box<dyn Embedder>>,
}

impl AllEmbedders {
    pub fn new(embedders: Vec<Box<dyn Embedder>>) -> Self {
        AllEmbedders {
            name: "AllEmbedders".to_string(),
            embedders,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl Embedder for AllEmbedders {
    fn name(&self) -> &str {
        &self.name
    }

    fn embed_into(
        &self,
        background: &mut [char],
        tracker: &mut OccupancyTracker,
        info: &mut AdditionalInfo,
        rng: &mut dyn RngCore,
    ) -> Result<(), SimdnaError> {
        for embedder in &self.embedders {
            embedder.embed(background, tracker, info, rng)?;
        }
        Ok(())
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "AllEmbedders",
            "embedders": self.embedders.iter().map(|e| e.to_json()).collect::<Vec<_>>(),
        })
    }
}

///
/// Embeds at a requested start position, moving it if needed.
///
/// The exact start is used when it is free. Otherwise the embedder scans
/// outward one base at a time, picking left or right first at random and
/// exhausting that side before trying the other, and takes the first offset
/// where the whole embeddable fits. If nothing fits the embedding is
/// skipped with a warning.
///
pub struct FixedEmbeddableWithPosEmbedder {
    name: String,
    embeddable_generator: Box<dyn EmbeddableGenerator>,
    start: usize,
}

impl FixedEmbeddableWithPosEmbedder {
    pub fn new(embeddable_generator: Box<dyn EmbeddableGenerator>, start: usize) -> Self {
        FixedEmbeddableWithPosEmbedder {
            name: "FixedEmbeddableWithPosEmbedder".to_string(),
            embeddable_generator,
            start,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl Embedder for FixedEmbeddableWithPosEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn embed_into(
        &self,
        background: &mut [char],
        tracker: &mut OccupancyTracker,
        _info: &mut AdditionalInfo,
        rng: &mut dyn RngCore,
    ) -> Result<(), SimdnaError> {
        let embeddable = self.embeddable_generator.generate_embeddable(rng)?;
        let bg_len = background.len();

        if self.start < bg_len && embeddable.can_embed(tracker, self.start) {
            embeddable.embed_in_background(tracker, background, self.start);
            return Ok(());
        }

        let fits = |pos: usize| pos + embeddable.len() <= bg_len && embeddable.can_embed(tracker, pos);
        let last_start = bg_len.saturating_sub(embeddable.len());
        let mut leftward = (0..self.start.min(last_start + 1)).rev();
        let mut rightward = (self.start + 1)..=last_start;
        let found = if uniform(rng) < 0.5 {
            leftward.find(|p| fits(*p)).or_else(|| rightward.find(|p| fits(*p)))
        } else {
            rightward.find(|p| fits(*p)).or_else(|| leftward.find(|p| fits(*p)))
        };

        match found {
            Some(pos) => embeddable.embed_in_background(tracker, background, pos),
            None => warn!(
                "could not find a free position for {} near {} in a background of length {}; skipping",
                embeddable, self.start, bg_len
            ),
        }
        Ok(())
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "FixedEmbeddableWithPosEmbedder",
            "embeddableGenerator": self.embeddable_generator.to_json(),
            "startPos": self.start,
        })
    }
}
