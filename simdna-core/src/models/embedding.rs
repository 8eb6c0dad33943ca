use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::errors::SimdnaError;
use crate::models::embeddable::{Embeddable, StringEmbeddable};

static EMBEDDING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^pos-(\d+)_(.*)$").expect("embedding regex is valid"));

/// An embeddable bound to its start offset in a generated sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embedding {
    pub what: Embeddable,
    pub start: usize,
}

impl Embedding {
    pub fn new(what: Embeddable, start: usize) -> Self {
        Embedding { what, start }
    }

    /// One past the last position covered by the embedding.
    pub fn end(&self) -> usize {
        self.start + self.what.len()
    }
}

impl Display for Embedding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pos-{}_{}", self.start, self.what)
    }
}

impl FromStr for Embedding {
    type Err = SimdnaError;

    /// Parses `pos-<start>_<embeddable>`. The embeddable part always comes
    /// back as a [`StringEmbeddable`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = EMBEDDING_RE
            .captures(s)
            .ok_or_else(|| SimdnaError::EmbeddingParseError(s.to_string()))?;
        let start = caps[1]
            .parse::<usize>()
            .map_err(|_| SimdnaError::EmbeddingParseError(s.to_string()))?;
        let what: StringEmbeddable = caps[2].parse()?;
        Ok(Embedding::new(what.into(), start))
    }
}

impl Serialize for Embedding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse the comma-separated embeddings column of a simdata file.
pub fn embeddings_from_string(s: &str) -> Result<Vec<Embedding>, SimdnaError> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    s.split(',').map(str::parse).collect()
}

pub fn embeddings_to_string(embeddings: &[Embedding]) -> String {
    embeddings
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
