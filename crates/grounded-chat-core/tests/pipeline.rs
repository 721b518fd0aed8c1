//! Index, retrieve, and generate with in-process collaborators.

use grounded_chat_core::chunk::ChunkParams;
use grounded_chat_core::context::{format_context, CONTEXT_HEADER};
use grounded_chat_core::embedding::Embedder;
use grounded_chat_core::generate::{generate_structured, Generator};
use grounded_chat_core::index::build_index;
use grounded_chat_core::models::{ConversationMessage, Document, Role};
use grounded_chat_core::search::search_index;
use grounded_chat_core::{Error, ValidationError};
use std::cell::RefCell;
use std::collections::VecDeque;

const TOPICS: [&str; 3] = ["sleep", "homework", "money"];

/// One dimension per topic word; 1.0 when the text mentions it.
struct TopicEmbedder;

impl Embedder for TopicEmbedder {
    fn embed(&self, _model: &str, inputs: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(inputs
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                TOPICS
                    .iter()
                    .map(|t| if lower.contains(t) { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect())
    }
}

struct Scripted {
    replies: RefCell<VecDeque<String>>,
    seen: RefCell<Vec<Vec<ConversationMessage>>>,
}

impl Scripted {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: RefCell::new(replies.iter().map(|r| r.to_string()).collect()),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl Generator for Scripted {
    fn chat(
        &self,
        _model: &str,
        messages: &[ConversationMessage],
        _schema: Option<&serde_json::Value>,
    ) -> anyhow::Result<String> {
        self.seen.borrow_mut().push(messages.to_vec());
        self.replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("script exhausted"))
    }
}

const VALID: &str = r#"{"reply":"Try a fixed bedtime.","follow_up_questions":["How old is your child?"],"is_medical":false,"is_legal":false,"is_financial":false,"is_not_appropriate":false,"safety_note":null}"#;

fn corpus() -> Vec<Document> {
    vec![
        Document::new("a.txt", "Children need regular sleep and a calm evening."),
        Document::new("b.txt", "Homework goes faster in short focused blocks."),
    ]
}

#[test]
fn two_short_files_make_two_fragments() {
    let index = build_index(
        &TopicEmbedder,
        "topic",
        &corpus(),
        ChunkParams::default(),
        None,
    )
    .unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.source_count(), 2);
    assert_eq!(index.dims(), TOPICS.len());
}

#[test]
fn retrieval_grounds_the_prompt() {
    let index = build_index(
        &TopicEmbedder,
        "topic",
        &corpus(),
        ChunkParams::default(),
        None,
    )
    .unwrap();

    let hits = search_index(&TopicEmbedder, "topic", &index, "my kid won't sleep", 1).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].source_id, "a.txt");

    let grounding = format_context(hits);
    assert!(grounding.starts_with(CONTEXT_HEADER));
    assert!(grounding.contains("- Source: a.txt"));
    assert!(!grounding.contains("b.txt"));

    let messages = vec![
        ConversationMessage::system("Persona: Parent"),
        ConversationMessage::system(grounding),
        ConversationMessage::user("my kid won't sleep"),
    ];
    let generator = Scripted::new(&[VALID]);
    let result = generate_structured(&generator, "chat", &messages, 2).unwrap();
    assert_eq!(result.reply, "Try a fixed bedtime.");
    assert!(result.raised_flags().is_empty());
}

#[test]
fn two_bad_replies_then_valid_takes_three_attempts() {
    let generator = Scripted::new(&["not json", r#"{"reply":"hi"}"#, VALID]);
    let messages = vec![ConversationMessage::user("hello")];
    let result = generate_structured(&generator, "chat", &messages, 2).unwrap();
    assert_eq!(result.follow_up_questions, vec!["How old is your child?"]);

    let seen = generator.seen.borrow();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].len(), 1);
    assert_eq!(seen[2].len(), 3);
    assert!(seen[2][1..].iter().all(|m| m.role == Role::System));
}

#[test]
fn retries_exhausted_reports_last_problem() {
    let generator = Scripted::new(&["[]", "[]", r#"{"reply": 3}"#]);
    let messages = vec![ConversationMessage::user("hello")];
    let err = generate_structured(&generator, "chat", &messages, 2).unwrap_err();
    match err {
        Error::Generation { attempts, last } => {
            assert_eq!(attempts, 3);
            assert!(matches!(last, ValidationError::MissingFields(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn query_with_foreign_model_is_rejected() {
    let index = build_index(
        &TopicEmbedder,
        "topic",
        &corpus(),
        ChunkParams::default(),
        None,
    )
    .unwrap();
    let err = search_index(&TopicEmbedder, "other-model", &index, "sleep", 1).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}
