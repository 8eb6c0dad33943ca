use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Serialize, Serializer};
use tracing::warn;

use crate::errors::SimdnaError;
use crate::models::tracker::OccupancyTracker;

/// An atomic string to be placed in a background, e.g. a PWM sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringEmbeddable {
    pub string: String,
    pub description: String,
}

impl StringEmbeddable {
    pub fn new(string: &str, description: &str) -> Self {
        StringEmbeddable {
            string: string.to_string(),
            description: description.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.string.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.string.is_empty()
    }

    fn write_into(&self, background: &mut [char], start: usize) {
        let positions_left = background.len().saturating_sub(start);
        let len = self.len();
        if positions_left < len {
            warn!(
                "length of background is {} but was asked to embed string of length {} at position {}; truncating",
                background.len(),
                len,
                start
            );
        }
        for (slot, c) in background
            .iter_mut()
            .skip(start)
            .zip(self.string.chars())
        {
            *slot = c;
        }
    }
}

impl Display for StringEmbeddable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{}", self.string)
        } else {
            write!(f, "{}-{}", self.description, self.string)
        }
    }
}

impl FromStr for StringEmbeddable {
    type Err = SimdnaError;

    /// Inverse of `Display`: everything before the last hyphen is the
    /// description, so `revComp-` prefixed descriptions survive the trip.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once('-') {
            Some((description, string)) => Ok(StringEmbeddable::new(string, description)),
            None => Ok(StringEmbeddable::new(s, "")),
        }
    }
}

/// Two embeddables placed `separation` positions apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairEmbeddable {
    pub embeddable1: Box<Embeddable>,
    pub embeddable2: Box<Embeddable>,
    pub separation: usize,
    pub description: String,
    /// When set, the gap is reserved along with the two children.
    pub nothing_in_between: bool,
}

impl PairEmbeddable {
    pub fn new(embeddable1: Embeddable, embeddable2: Embeddable, separation: usize) -> Self {
        PairEmbeddable {
            embeddable1: Box::new(embeddable1),
            embeddable2: Box::new(embeddable2),
            separation,
            description: String::new(),
            nothing_in_between: true,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_nothing_in_between(mut self, nothing_in_between: bool) -> Self {
        self.nothing_in_between = nothing_in_between;
        self
    }

    pub fn len(&self) -> usize {
        self.embeddable1.len() + self.separation + self.embeddable2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start offset of the second child relative to the pair's start.
    pub fn second_offset(&self) -> usize {
        self.embeddable1.len() + self.separation
    }

    fn write_into(&self, background: &mut [char], start: usize) {
        self.embeddable1.write_into(background, start);
        self.embeddable2
            .write_into(background, start + self.second_offset());
    }
}

impl Display for PairEmbeddable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.description.is_empty() {
            write!(f, "{}-", self.description)?;
        }
        write!(
            f,
            "{}-Gap{}-{}",
            self.embeddable1, self.separation, self.embeddable2
        )
    }
}

///
/// Something that occupies a span of a background.
///
/// The string form of an embeddable is what gets written to simdata files;
/// see [`StringEmbeddable`] for how it is parsed back.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Embeddable {
    String(StringEmbeddable),
    Pair(PairEmbeddable),
}

impl Embeddable {
    pub fn len(&self) -> usize {
        match self {
            Embeddable::String(e) => e.len(),
            Embeddable::Pair(e) => e.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn description(&self) -> &str {
        match self {
            Embeddable::String(e) => &e.description,
            Embeddable::Pair(e) => &e.description,
        }
    }

    /// Whether the embeddable fits at `start` given what is already placed.
    pub fn can_embed(&self, tracker: &OccupancyTracker, start: usize) -> bool {
        match self {
            Embeddable::String(e) => tracker.can_embed(start, start + e.len()),
            Embeddable::Pair(e) => {
                if e.nothing_in_between {
                    tracker.can_embed(start, start + e.len())
                } else {
                    let second = start + e.second_offset();
                    tracker.can_embed(start, start + e.embeddable1.len())
                        && tracker.can_embed(second, second + e.embeddable2.len())
                }
            }
        }
    }

    ///
    /// Write the embeddable into `background` at `start` and commit it to
    /// the tracker.
    ///
    /// A pair that reserves its gap is committed as one embedding; otherwise
    /// each child is committed on its own.
    ///
    pub fn embed_in_background(
        &self,
        tracker: &mut OccupancyTracker,
        background: &mut [char],
        start: usize,
    ) {
        match self {
            Embeddable::Pair(pair) if !pair.nothing_in_between => {
                pair.embeddable1.embed_in_background(tracker, background, start);
                pair.embeddable2
                    .embed_in_background(tracker, background, start + pair.second_offset());
            }
            _ => {
                self.write_into(background, start);
                tracker.add_embedding(start, self.clone());
            }
        }
    }

    fn write_into(&self, background: &mut [char], start: usize) {
        match self {
            Embeddable::String(e) => e.write_into(background, start),
            Embeddable::Pair(e) => e.write_into(background, start),
        }
    }
}

impl Display for Embeddable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Embeddable::String(e) => e.fmt(f),
            Embeddable::Pair(e) => e.fmt(f),
        }
    }
}

impl From<StringEmbeddable> for Embeddable {
    fn from(value: StringEmbeddable) -> Self {
        Embeddable::String(value)
    }
}

impl From<PairEmbeddable> for Embeddable {
    fn from(value: PairEmbeddable) -> Self {
        Embeddable::Pair(value)
    }
}

impl Serialize for Embeddable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
