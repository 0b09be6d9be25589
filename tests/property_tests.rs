//! Property-based tests for the recursive splitter.
//!
//! These verify the invariants the splitter promises for all inputs:
//! - Productive: non-empty input yields at least one chunk
//! - Bounded: no chunk exceeds the configured size (in characters)
//! - Overlap: carried context is a bounded suffix of the previous chunk
//! - Ordered: recorded offsets are monotonic and start at zero
//! - Idempotent: input already within bounds comes back as one chunk

use proptest::prelude::*;
use stratus::{char_len, RawChunk, RecursiveSplitter, SeparatorSpec, SplitConfig};

// =============================================================================
// Test Generators
// =============================================================================

/// English-like prose: words grouped into sentences.
fn prose_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::string::string_regex("[A-Za-z]{2,12}").unwrap(), 5..80).prop_map(
        |words| {
            words
                .chunks(7)
                .map(|sentence| sentence.join(" "))
                .collect::<Vec<_>>()
                .join(". ")
        },
    )
}

/// CJK prose: ideograph runs terminated with 。
fn cjk_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::string::string_regex(r"[\x{4e00}-\x{4eff}]{3,10}").unwrap(),
        3..40,
    )
    .prop_map(|sentences| format!("{}。", sentences.join("。")))
}

fn splitter(chunk_size: usize, overlap: usize) -> RecursiveSplitter {
    let config = SplitConfig::new(chunk_size)
        .unwrap()
        .with_overlap(overlap)
        .with_min_chunk_size(1);
    RecursiveSplitter::new(config, &SeparatorSpec::default()).unwrap()
}

// =============================================================================
// Invariant Helpers
// =============================================================================

fn overlaps_are_bounded_suffixes(chunks: &[RawChunk], overlap: usize) -> bool {
    chunks.windows(2).all(|pair| match &pair[1].overlap_content {
        None => true,
        Some(carried) => pair[0].content.ends_with(carried.as_str()) && char_len(carried) <= overlap,
    })
}

fn offsets_monotonic(chunks: &[RawChunk]) -> bool {
    let mut last = 0;
    for chunk in chunks {
        match chunk.start_index {
            Some(start) if start >= last => last = start,
            _ => return false,
        }
    }
    true
}

// =============================================================================
// Splitter Properties
// =============================================================================

proptest! {
    #[test]
    fn non_empty_input_yields_chunks(text in prose_text()) {
        let chunks = splitter(100, 10).split(&text);
        prop_assert!(!chunks.is_empty());
    }

    #[test]
    fn chunks_respect_size(text in prose_text(), size in 20usize..200) {
        let chunks = splitter(size, 0).split(&text);
        for chunk in &chunks {
            prop_assert!(
                char_len(&chunk.content) <= size,
                "chunk of {} chars exceeds {}",
                char_len(&chunk.content),
                size
            );
        }
    }

    #[test]
    fn cjk_chunks_respect_size_in_characters(text in cjk_text(), size in 10usize..60) {
        let chunks = splitter(size, 0).split(&text);
        for chunk in &chunks {
            prop_assert!(char_len(&chunk.content) <= size);
        }
    }

    #[test]
    fn overlap_is_bounded_suffix(text in prose_text(), overlap in 1usize..15) {
        let chunks = splitter(40, overlap).split(&text);
        prop_assert!(overlaps_are_bounded_suffixes(&chunks, overlap));
    }

    #[test]
    fn first_chunk_has_no_overlap(text in prose_text()) {
        let chunks = splitter(40, 10).split(&text);
        if let Some(first) = chunks.first() {
            prop_assert!(first.overlap_content.is_none());
        }
    }

    #[test]
    fn offsets_start_at_zero_and_never_regress(text in prose_text()) {
        let config = SplitConfig::new(50)
            .unwrap()
            .with_overlap(0)
            .with_min_chunk_size(1)
            .with_start_index(true);
        let splitter = RecursiveSplitter::new(config, &SeparatorSpec::default()).unwrap();
        let chunks = splitter.split(&text);

        prop_assert!(!chunks.is_empty());
        prop_assert_eq!(chunks[0].start_index, Some(0));
        prop_assert!(offsets_monotonic(&chunks));
    }

    #[test]
    fn within_bounds_input_is_idempotent(text in prose_text()) {
        let size = char_len(&text) + 1;
        let chunks = splitter(size, 10).split(&text);
        prop_assert_eq!(chunks.len(), 1);
        prop_assert_eq!(chunks[0].content.as_str(), text.trim());
    }

    #[test]
    fn splitting_is_deterministic(text in cjk_text()) {
        let s = splitter(30, 5);
        let first = s.split(&text);
        let second = s.split(&text);
        prop_assert_eq!(first, second);
    }
}

// =============================================================================
// Degenerate Inputs
// =============================================================================

#[test]
fn empty_input_produces_empty_output() {
    assert!(splitter(50, 10).split("").is_empty());
    assert!(splitter(50, 10).split("   \n\t  ").is_empty());
}

#[test]
fn single_word_input() {
    let chunks = splitter(50, 10).split("hello");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, "hello");
}

#[test]
fn very_long_unbroken_run_terminates() {
    let text = "a".repeat(5000);
    let chunks = splitter(100, 10).split(&text);
    assert_eq!(chunks.len(), 50);
    assert!(chunks.iter().all(|c| char_len(&c.content) <= 100));
}

#[test]
fn mixed_scripts_split_cleanly() {
    let text = "Hydraulic pressure 检查液压。Check the 起落架 landing gear。Привет мир。";
    let chunks = splitter(25, 5).split(text);
    assert!(!chunks.is_empty());
    for chunk in &chunks {
        assert!(char_len(&chunk.content) <= 25);
    }
}
