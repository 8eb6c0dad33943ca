use crate::models::embeddable::Embeddable;
use crate::models::embedding::Embedding;

/// Records which positions of one background are taken, and by what.
///
/// Ranges are half-open and clamped to the background length, so a query
/// that runs off the end only looks at the part that exists.
#[derive(Debug, Clone)]
pub struct OccupancyTracker {
    occupied: Vec<bool>,
    embeddings: Vec<Embedding>,
}

impl OccupancyTracker {
    pub fn new(seq_len: usize) -> Self {
        OccupancyTracker {
            occupied: vec![false; seq_len],
            embeddings: Vec::new(),
        }
    }

    fn clamp(&self, start: usize, end: usize) -> (usize, usize) {
        let end = end.min(self.occupied.len());
        (start.min(end), end)
    }

    pub fn can_embed(&self, start: usize, end: usize) -> bool {
        let (start, end) = self.clamp(start, end);
        !self.occupied[start..end].iter().any(|o| *o)
    }

    pub fn add_embedding(&mut self, start: usize, what: Embeddable) {
        let (from, to) = self.clamp(start, start + what.len());
        self.occupied[from..to].iter_mut().for_each(|o| *o = true);
        self.embeddings.push(Embedding::new(what, start));
    }

    pub fn num_occupied_pos(&self) -> usize {
        self.occupied.iter().filter(|o| **o).count()
    }

    pub fn total_pos(&self) -> usize {
        self.occupied.len()
    }

    pub fn embeddings(&self) -> &[Embedding] {
        &self.embeddings
    }

    pub fn into_embeddings(self) -> Vec<Embedding> {
        self.embeddings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::models::embeddable::StringEmbeddable;

    #[rstest]
    #[case(0, 5, true)]
    #[case(0, 6, false)]
    #[case(5, 10, false)]
    #[case(9, 10, false)]
    #[case(10, 12, true)]
    #[case(12, 40, true)]
    #[case(35, 40, true)]
    fn test_can_embed(#[case] start: usize, #[case] end: usize, #[case] expected: bool) {
        let mut tracker = OccupancyTracker::new(30);
        tracker.add_embedding(5, StringEmbeddable::new("ACGTA", "m").into());
        assert_eq!(tracker.can_embed(start, end), expected);
    }

    #[rstest]
    fn test_counts_and_records() {
        let mut tracker = OccupancyTracker::new(10);
        tracker.add_embedding(0, StringEmbeddable::new("AC", "a").into());
        tracker.add_embedding(8, StringEmbeddable::new("GTT", "b").into());

        assert_eq!(tracker.total_pos(), 10);
        assert_eq!(tracker.num_occupied_pos(), 4);
        let strings: Vec<String> = tracker
            .into_embeddings()
            .iter()
            .map(|e| e.to_string())
            .collect();
        assert_eq!(strings, vec!["pos-0_a-AC", "pos-8_b-GTT"]);
    }
}
