//! Single-base substitutions applied to generated substrings.

use rand::RngCore;
use serde_json::{Value, json};

use crate::errors::SimdnaError;
use crate::utils::sample_index;

/// One substitution at `index`: `previous` becomes `new`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub index: usize,
    pub previous: char,
    pub new: char,
    /// Length of the string the index points into, checked when set.
    pub parent_length: Option<usize>,
}

impl Mutation {
    pub fn new(
        index: usize,
        previous: char,
        new: char,
        parent_length: Option<usize>,
    ) -> Result<Self, SimdnaError> {
        if previous == new {
            return Err(SimdnaError::InvalidMutation(format!(
                "mutation at {} does not change the base {}",
                index, previous
            )));
        }
        if let Some(len) = parent_length {
            if index >= len {
                return Err(SimdnaError::InvalidMutation(format!(
                    "index {} is outside a parent of length {}",
                    index, len
                )));
            }
        }
        Ok(Mutation {
            index,
            previous,
            new,
            parent_length,
        })
    }

    fn check_target(&self, seq: &[char]) -> Result<(), SimdnaError> {
        if let Some(len) = self.parent_length {
            if seq.len() != len {
                return Err(SimdnaError::InvalidMutation(format!(
                    "expected a string of length {} but got one of length {}",
                    len,
                    seq.len()
                )));
            }
        }
        if self.index >= seq.len() {
            return Err(SimdnaError::InvalidMutation(format!(
                "index {} is outside a string of length {}",
                self.index,
                seq.len()
            )));
        }
        Ok(())
    }

    /// Substitute `new` for `previous`; the current base must be `previous`.
    pub fn apply(&self, seq: &mut [char]) -> Result<(), SimdnaError> {
        self.check_target(seq)?;
        if seq[self.index] != self.previous {
            return Err(SimdnaError::InvalidMutation(format!(
                "expected {} at position {} but found {}",
                self.previous, self.index, seq[self.index]
            )));
        }
        seq[self.index] = self.new;
        Ok(())
    }

    /// Put the reference base back, whatever is currently there.
    pub fn revert(&self, seq: &mut [char]) -> Result<(), SimdnaError> {
        self.check_target(seq)?;
        seq[self.index] = self.previous;
        Ok(())
    }

    pub fn to_json(&self) -> Value {
        json!({
            "index": self.index,
            "previous": self.previous.to_string(),
            "new": self.new.to_string(),
            "parentLength": self.parent_length,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SetOfMutations {
    mutations: Vec<Mutation>,
}

impl SetOfMutations {
    pub fn new(mutations: Vec<Mutation>) -> Result<Self, SimdnaError> {
        if mutations.is_empty() {
            return Err(SimdnaError::InvalidMutation(
                "a set of mutations needs at least one mutation".to_string(),
            ));
        }
        Ok(SetOfMutations { mutations })
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn to_json(&self) -> Value {
        Value::Array(self.mutations.iter().map(Mutation::to_json).collect())
    }
}

/// An in-place edit of a character array.
pub trait Transformation {
    fn transform(&self, seq: &mut [char], rng: &mut dyn RngCore) -> Result<(), SimdnaError>;

    fn to_json(&self) -> Value;
}

/// Applies one mutation picked uniformly from the set.
pub struct ChooseMutationAtRandom {
    mutations: SetOfMutations,
}

impl ChooseMutationAtRandom {
    pub fn new(mutations: SetOfMutations) -> Self {
        ChooseMutationAtRandom { mutations }
    }
}

impl Transformation for ChooseMutationAtRandom {
    fn transform(&self, seq: &mut [char], rng: &mut dyn RngCore) -> Result<(), SimdnaError> {
        let all = self.mutations.mutations();
        all[sample_index(all.len(), rng)].apply(seq)
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "ChooseMutationAtRandom",
            "selectedMutations": self.mutations.to_json(),
        })
    }
}

/// Reverts every mutation in the set.
pub struct RevertToReference {
    mutations: SetOfMutations,
}

impl RevertToReference {
    pub fn new(mutations: SetOfMutations) -> Self {
        RevertToReference { mutations }
    }
}

impl Transformation for RevertToReference {
    fn transform(&self, seq: &mut [char], _rng: &mut dyn RngCore) -> Result<(), SimdnaError> {
        let all = self.mutations.mutations();
        // leave the sequence untouched unless every mutation fits
        all.iter().try_for_each(|m| m.check_target(seq))?;
        all.iter().try_for_each(|m| m.revert(seq))
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "RevertToReference",
            "setOfMutations": self.mutations.to_json(),
        })
    }
}
