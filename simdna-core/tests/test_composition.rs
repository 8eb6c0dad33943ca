//! End-to-end checks of composed generators.
//!
//! These run whole sequence sets through the public API and look at the
//! statistics of what comes out. Unit tests of the individual operators live
//! next to them in src/.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use simdna_core::assembly::{
    EmbedInABackground, GenerateSequenceNTimes, SequenceSetGenerator,
    generate_sequence_given_background_and_embedders,
};
use simdna_core::background::{FixedBackgroundGenerator, ZeroOrderBackgroundGenerator};
use simdna_core::embeddable_gen::PairEmbeddableGenerator;
use simdna_core::embedders::{
    Embedder, EmbeddableEmbedder, RandomSubsetOfEmbedders, RepeatedEmbedder, SubstringEmbedder,
};
use simdna_core::models::{Embeddable, embeddings_from_string, embeddings_to_string};
use simdna_core::quantity::{FixedQuantityGenerator, UniformIntegerGenerator};
use simdna_core::substring::FixedSubstringGenerator;

fn substring_embedder(s: &str, name: &str) -> Box<dyn Embedder> {
    Box::new(SubstringEmbedder::new(Box::new(FixedSubstringGenerator::new(s))).with_name(name))
}

#[test]
fn test_uniform_positions_are_uniform() {
    let mut rng = StdRng::seed_from_u64(2024);
    let runs = 10_000;
    let mut background = FixedBackgroundGenerator::new(&"N".repeat(50));
    let embedders = vec![substring_embedder("ACGTA", "motif")];

    let mut counts = vec![0usize; 46];
    for _ in 0..runs {
        let generated =
            generate_sequence_given_background_and_embedders(&mut background, &embedders, "s", &mut rng)
                .expect("generation failed");
        counts[generated.embeddings[0].start] += 1;
    }

    let expected = 1.0 / 46.0;
    for (start, count) in counts.iter().enumerate() {
        let freq = *count as f64 / runs as f64;
        assert!(
            (freq - expected).abs() < 0.01,
            "start {} has frequency {}",
            start,
            freq
        );
    }
}

#[test]
fn test_zero_order_frequencies() {
    let mut rng = StdRng::seed_from_u64(99);
    let frequencies: BTreeMap<char, f64> = [('A', 0.1), ('C', 0.2), ('G', 0.3), ('T', 0.4)]
        .into_iter()
        .collect();
    let single = EmbedInABackground::new(
        Box::new(ZeroOrderBackgroundGenerator::from_frequencies(100, frequencies.clone()).unwrap()),
        vec![],
    );
    let generated = GenerateSequenceNTimes::new(Box::new(single), 500)
        .generate_sequences(&mut rng)
        .unwrap();

    let mut counts: BTreeMap<char, usize> = BTreeMap::new();
    for s in &generated {
        assert_eq!(s.seq.len(), 100);
        for c in s.seq.chars() {
            *counts.entry(c).or_insert(0) += 1;
        }
    }
    for (c, expected) in frequencies {
        let observed = counts[&c] as f64 / 50_000.0;
        assert!((observed - expected).abs() < 0.01, "{} at {}", c, observed);
    }
}

#[test]
fn test_random_subset_statistics() {
    let mut rng = StdRng::seed_from_u64(7);
    let names = ["e0", "e1", "e2", "e3", "e4"];
    let subset = RandomSubsetOfEmbedders::new(
        Box::new(UniformIntegerGenerator::new(1, 4).unwrap()),
        names.iter().map(|n| substring_embedder("A", n)).collect(),
    );
    let embedders: Vec<Box<dyn Embedder>> = vec![Box::new(subset)];
    let mut background = FixedBackgroundGenerator::new(&"C".repeat(100));

    let runs = 8000;
    let mut subset_sizes = [0usize; 6];
    let mut fired = [0usize; 5];
    for _ in 0..runs {
        let generated =
            generate_sequence_given_background_and_embedders(&mut background, &embedders, "s", &mut rng)
                .unwrap();
        let mut size = 0;
        for (idx, name) in names.iter().enumerate() {
            if generated.additional_info.is_in_trace(name) {
                fired[idx] += 1;
                size += 1;
            }
        }
        subset_sizes[size] += 1;
    }

    assert_eq!(subset_sizes[0], 0);
    assert_eq!(subset_sizes[5], 0);
    for size in 1..=4 {
        let freq = subset_sizes[size] as f64 / runs as f64;
        assert!((freq - 0.25).abs() < 0.03, "size {} at {}", size, freq);
    }
    for (idx, count) in fired.iter().enumerate() {
        let freq = *count as f64 / runs as f64;
        assert!((freq - 0.5).abs() < 0.03, "{} at {}", names[idx], freq);
    }
}

#[test]
fn test_split_pair_geometry() {
    let mut rng = StdRng::seed_from_u64(11);
    let pair_generator = PairEmbeddableGenerator::from_substring_generators(
        Box::new(FixedSubstringGenerator::new("GGG")),
        Box::new(FixedSubstringGenerator::new("TT")),
        Box::new(UniformIntegerGenerator::new(0, 5).unwrap()),
    )
    .with_nothing_in_between(false);
    let embedders: Vec<Box<dyn Embedder>> =
        vec![Box::new(EmbeddableEmbedder::new(Box::new(pair_generator)))];
    let mut background = FixedBackgroundGenerator::new(&"A".repeat(40));

    for _ in 0..200 {
        let generated =
            generate_sequence_given_background_and_embedders(&mut background, &embedders, "s", &mut rng)
                .unwrap();
        let mut embeddings = generated.embeddings.clone();
        embeddings.sort_by_key(|e| e.start);
        assert_eq!(embeddings.len(), 2);

        let gap = embeddings[1].start - embeddings[0].end();
        assert!(gap <= 5);
        assert_eq!(&generated.seq[embeddings[0].start..embeddings[0].end()], "GGG");
        assert_eq!(&generated.seq[embeddings[1].start..embeddings[1].end()], "TT");
        assert_eq!(generated.seq.matches('G').count(), 3);
    }
}

#[test]
fn test_embeddings_never_overlap_and_match_sequence() {
    let mut rng = StdRng::seed_from_u64(5);
    let single = EmbedInABackground::new(
        Box::new(ZeroOrderBackgroundGenerator::with_default_frequencies(80).unwrap()),
        vec![
            Box::new(RepeatedEmbedder::new(
                substring_embedder("GATAAG", "gata"),
                Box::new(UniformIntegerGenerator::new(0, 4).unwrap()),
            )),
            Box::new(RepeatedEmbedder::new(
                substring_embedder("CCAAT", "ccaat"),
                Box::new(FixedQuantityGenerator::new(3)),
            )),
        ],
    );
    let generated = GenerateSequenceNTimes::new(Box::new(single), 300)
        .generate_sequences(&mut rng)
        .unwrap();

    for s in &generated {
        let mut occupied = vec![false; s.seq.len()];
        for embedding in &s.embeddings {
            assert!(embedding.end() <= s.seq.len());
            for pos in embedding.start..embedding.end() {
                assert!(!occupied[pos], "{} overlaps at {}", s.seq_name, pos);
                occupied[pos] = true;
            }
            let Embeddable::String(what) = &embedding.what else {
                panic!("expected a string embeddable");
            };
            assert_eq!(&s.seq[embedding.start..embedding.end()], what.string);
        }
        assert_eq!(s.additional_info.trace_count("ccaat"), 3);
    }
}

#[test]
fn test_embeddings_column_round_trips() {
    let mut rng = StdRng::seed_from_u64(123);
    let mut background = FixedBackgroundGenerator::new(&"N".repeat(30));
    let embedders = vec![
        substring_embedder("ACGT", "first"),
        substring_embedder("TTT", "second"),
    ];
    let generated =
        generate_sequence_given_background_and_embedders(&mut background, &embedders, "s", &mut rng)
            .unwrap();

    let column = embeddings_to_string(&generated.embeddings);
    let parsed = embeddings_from_string(&column).unwrap();
    assert_eq!(parsed, generated.embeddings);
}
