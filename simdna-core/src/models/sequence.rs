use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::models::embedding::Embedding;

/// Provenance collected while one sequence is assembled.
///
/// `trace` counts how often each named operator fired; `additional` holds
/// free-form values an operator wants to attach to the sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdditionalInfo {
    pub trace: BTreeMap<String, usize>,
    pub additional: BTreeMap<String, Value>,
}

impl AdditionalInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_trace(&mut self, operator_name: &str) {
        *self.trace.entry(operator_name.to_string()).or_insert(0) += 1;
    }

    pub fn is_in_trace(&self, operator_name: &str) -> bool {
        self.trace.contains_key(operator_name)
    }

    pub fn trace_count(&self, operator_name: &str) -> usize {
        self.trace.get(operator_name).copied().unwrap_or(0)
    }

    pub fn update_additional_info(&mut self, operator_name: &str, value: Value) {
        self.additional.insert(operator_name.to_string(), value);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedSequence {
    pub seq_name: String,
    pub seq: String,
    pub embeddings: Vec<Embedding>,
    pub additional_info: AdditionalInfo,
}

impl GeneratedSequence {
    pub fn new(
        seq_name: String,
        seq: String,
        embeddings: Vec<Embedding>,
        additional_info: AdditionalInfo,
    ) -> Self {
        GeneratedSequence {
            seq_name,
            seq,
            embeddings,
            additional_info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use crate::models::embeddable::StringEmbeddable;

    #[rstest]
    fn test_trace_counts_invocations() {
        let mut info = AdditionalInfo::new();
        info.update_trace("motif1Embedder");
        info.update_trace("motif1Embedder");
        info.update_trace("UniformPositionGenerator");

        assert!(info.is_in_trace("motif1Embedder"));
        assert!(!info.is_in_trace("motif2Embedder"));
        assert_eq!(info.trace_count("motif1Embedder"), 2);
        assert_eq!(info.trace_count("motif2Embedder"), 0);
    }

    #[rstest]
    fn test_serializes_embeddings_as_strings() {
        let mut info = AdditionalInfo::new();
        info.update_trace("e");
        info.update_additional_info("e", json!({"tries": 3}));
        let seq = GeneratedSequence::new(
            "synth0".to_string(),
            "ACGT".to_string(),
            vec![Embedding::new(StringEmbeddable::new("CG", "m").into(), 1)],
            info,
        );

        assert_eq!(
            serde_json::to_value(&seq).unwrap(),
            json!({
                "seq_name": "synth0",
                "seq": "ACGT",
                "embeddings": ["pos-1_m-CG"],
                "additional_info": {
                    "trace": {"e": 1},
                    "additional": {"e": {"tries": 3}}
                }
            })
        );
    }
}
