//! Data models that flow through indexing, retrieval, and generation.

use serde::{Deserialize, Serialize};

/// Raw text of one source file, as produced by the document loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub source_id: String,
    pub text: String,
}

impl Document {
    pub fn new(source_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            text: text.into(),
        }
    }
}

/// A bounded-length slice of a document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub content: String,
    pub source_id: String,
}

/// A fragment together with its embedding vector.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedFragment {
    pub content: String,
    pub source_id: String,
    pub embedding: Vec<f32>,
}

/// Ranking-time pairing of a score with the fragment it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct ScoredFragment<'a> {
    pub score: f32,
    pub fragment: &'a IndexedFragment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One role-tagged entry of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A fully validated structured reply.
///
/// Only [`parse_structured`](crate::structured::parse_structured) builds
/// these from model output; serializing one yields the JSON shape that
/// parser accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredResult {
    pub reply: String,
    pub follow_up_questions: Vec<String>,
    pub is_medical: bool,
    pub is_legal: bool,
    pub is_financial: bool,
    pub is_not_appropriate: bool,
    pub safety_note: Option<String>,
}

impl StructuredResult {
    /// Names of the category flags that are set, in schema order.
    pub fn raised_flags(&self) -> Vec<&'static str> {
        [
            ("medical", self.is_medical),
            ("legal", self.is_legal),
            ("financial", self.is_financial),
            ("not appropriate", self.is_not_appropriate),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}
