//! Property-based tests for chunking, ranking, and structured parsing.

use proptest::prelude::*;

use grounded_chat_core::chunk::{chunk_text, window_spans};
use grounded_chat_core::embedding::Embedder;
use grounded_chat_core::index::FragmentIndex;
use grounded_chat_core::models::{IndexedFragment, StructuredResult};
use grounded_chat_core::search::search_scored;
use grounded_chat_core::structured::parse_structured;

/// `(max_chars, overlap)` with `overlap < max_chars`.
fn window_params() -> impl Strategy<Value = (usize, usize)> {
    (1usize..60).prop_flat_map(|max_chars| (Just(max_chars), 0..max_chars))
}

struct FixedEmbedder(Vec<f32>);

impl Embedder for FixedEmbedder {
    fn embed(&self, _model: &str, inputs: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(inputs.iter().map(|_| self.0.clone()).collect())
    }
}

// --- Chunking properties ---

proptest! {
    #[test]
    fn windows_cover_text_without_gaps(
        text in "(?s).{0,400}",
        (max_chars, overlap) in window_params(),
    ) {
        let spans = window_spans(&text, max_chars, overlap).unwrap();
        let mut rebuilt = String::new();
        for (i, span) in spans.iter().enumerate() {
            match spans.get(i + 1) {
                Some(next) => rebuilt.push_str(&text[span.start..next.start]),
                None => rebuilt.push_str(&text[span.clone()]),
            }
        }
        prop_assert_eq!(rebuilt, text);
    }

    #[test]
    fn consecutive_windows_advance_by_stride(
        text in "(?s).{1,400}",
        (max_chars, overlap) in window_params(),
    ) {
        let spans = window_spans(&text, max_chars, overlap).unwrap();
        for pair in spans.windows(2) {
            let step = text[pair[0].start..pair[1].start].chars().count();
            prop_assert_eq!(step, max_chars - overlap);
        }
    }

    #[test]
    fn fragments_are_trimmed_and_bounded(
        text in "(?s).{0,400}",
        (max_chars, overlap) in window_params(),
    ) {
        for piece in chunk_text(&text, max_chars, overlap).unwrap() {
            prop_assert!(!piece.is_empty());
            prop_assert!(piece.chars().count() <= max_chars);
            prop_assert_eq!(piece.trim(), piece.as_str());
        }
    }
}

// --- Ranking properties ---

proptest! {
    #[test]
    fn search_is_descending_and_bounded(
        vectors in prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 3), 1..40),
        query in prop::collection::vec(-10.0f32..10.0, 3),
        top_k in -5i64..50,
    ) {
        let fragments: Vec<IndexedFragment> = vectors
            .iter()
            .enumerate()
            .map(|(i, embedding)| IndexedFragment {
                content: format!("fragment {i}"),
                source_id: format!("doc{i}.md"),
                embedding: embedding.clone(),
            })
            .collect();
        let index = FragmentIndex::from_fragments("m", fragments).unwrap();
        let scored = search_scored(&FixedEmbedder(query), "m", &index, "q", top_k).unwrap();

        let expected = (top_k.max(0) as usize).min(vectors.len());
        prop_assert_eq!(scored.len(), expected);
        prop_assert!(scored.windows(2).all(|w| w[0].score >= w[1].score));
    }
}

// --- Structured output properties ---

fn structured_result() -> impl Strategy<Value = StructuredResult> {
    (
        ".{0,80}",
        prop::collection::vec(".{0,40}", 0..5),
        any::<[bool; 4]>(),
        prop::option::of(".{0,40}"),
    )
        .prop_map(|(reply, follow_up_questions, flags, safety_note)| StructuredResult {
            reply,
            follow_up_questions,
            is_medical: flags[0],
            is_legal: flags[1],
            is_financial: flags[2],
            is_not_appropriate: flags[3],
            safety_note,
        })
}

proptest! {
    #[test]
    fn structured_result_round_trips(result in structured_result()) {
        let raw = serde_json::to_string(&result).unwrap();
        prop_assert_eq!(parse_structured(&raw).unwrap(), result);
    }
}
