use std::collections::BTreeMap;

use crate::errors::SimdnaError;
use crate::models::Pwm;

/// Finalized PWMs keyed by motif name.
#[derive(Debug, Clone, Default)]
pub struct LoadedMotifs {
    motifs: BTreeMap<String, Pwm>,
}

impl LoadedMotifs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a motif under its own name, replacing any motif of the same name.
    pub fn insert(&mut self, pwm: Pwm) -> Result<(), SimdnaError> {
        if !pwm.is_finalized() {
            return Err(SimdnaError::PwmNotFinalized(pwm.name().to_string()));
        }
        self.motifs.insert(pwm.name().to_string(), pwm);
        Ok(())
    }

    pub fn get_pwm(&self, name: &str) -> Result<&Pwm, SimdnaError> {
        self.motifs
            .get(name)
            .ok_or_else(|| SimdnaError::UnknownMotif(name.to_string()))
    }

    /// Merge `other` into this set; motifs in `other` win on name clashes.
    pub fn add_motifs(&mut self, other: LoadedMotifs) -> &mut Self {
        self.motifs.extend(other.motifs);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.motifs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.motifs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motifs.is_empty()
    }
}
