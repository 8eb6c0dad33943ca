use crate::models::GeneratedSequence;

/// Derives a row of integer labels from a generated sequence.
pub trait LabelGenerator {
    fn label_names(&self) -> &[String];

    fn generate_labels(&self, sequence: &GeneratedSequence) -> Vec<i64>;
}

/// One label per operator name: 1 if that operator fired on the sequence.
pub struct IsInTraceLabelGenerator {
    label_names: Vec<String>,
}

impl IsInTraceLabelGenerator {
    pub fn new(label_names: Vec<String>) -> Self {
        IsInTraceLabelGenerator { label_names }
    }
}

impl LabelGenerator for IsInTraceLabelGenerator {
    fn label_names(&self) -> &[String] {
        &self.label_names
    }

    fn generate_labels(&self, sequence: &GeneratedSequence) -> Vec<i64> {
        self.label_names
            .iter()
            .map(|name| i64::from(sequence.additional_info.is_in_trace(name)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::models::AdditionalInfo;

    #[rstest]
    fn test_is_in_trace_labels() {
        let mut info = AdditionalInfo::new();
        info.update_trace("motif2");
        let seq = GeneratedSequence::new("s".to_string(), "ACGT".to_string(), vec![], info);
        let labels = IsInTraceLabelGenerator::new(vec!["motif1".to_string(), "motif2".to_string()]);
        assert_eq!(labels.generate_labels(&seq), vec![0, 1]);
        assert_eq!(labels.label_names(), &["motif1".to_string(), "motif2".to_string()]);
    }
}
