//! One conversation: persona, optional grounding index, and history.
//!
//! Each turn appends the user message, retrieves grounding fragments when
//! an index is present, builds the request as
//! `[persona prompt, grounding?] + history`, and generates either a
//! validated structured reply or plain text. Only the user message and the
//! final assistant reply enter the history; corrective retry messages never
//! do.

use anyhow::Result;
use grounded_chat_core::context::format_context;
use grounded_chat_core::embedding::Embedder;
use grounded_chat_core::generate::{generate_structured, generate_text, Generator};
use grounded_chat_core::index::FragmentIndex;
use grounded_chat_core::models::{ConversationMessage, StructuredResult};
use grounded_chat_core::search::search_index;
use std::fmt::Write;
use tracing::debug;

use crate::persona::Persona;

/// Prepend the persona prompt and optional grounding to `history`.
pub fn build_messages(
    persona: &dyn Persona,
    grounding: Option<&str>,
    history: &[ConversationMessage],
) -> Vec<ConversationMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ConversationMessage::system(persona.build_system_prompt()));
    if let Some(context) = grounding {
        messages.push(ConversationMessage::system(context));
    }
    messages.extend_from_slice(history);
    messages
}

/// Generation settings for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub chat_model: String,
    pub embedding_model: String,
    pub top_k: i64,
    pub structured: bool,
    pub max_retries: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Plain(String),
    Structured(StructuredResult),
}

impl Reply {
    /// Text recorded in the conversation history.
    pub fn text(&self) -> &str {
        match self {
            Reply::Plain(text) => text,
            Reply::Structured(result) => &result.reply,
        }
    }
}

pub struct ChatSession<'a> {
    persona: &'a dyn Persona,
    index: Option<&'a FragmentIndex>,
    options: SessionOptions,
    history: Vec<ConversationMessage>,
}

impl<'a> ChatSession<'a> {
    pub fn new(
        persona: &'a dyn Persona,
        index: Option<&'a FragmentIndex>,
        options: SessionOptions,
    ) -> Self {
        Self {
            persona,
            index,
            options,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[ConversationMessage] {
        &self.history
    }

    /// Run one user turn.
    ///
    /// On failure the user message is removed again so the history only
    /// holds completed exchanges.
    pub fn respond(
        &mut self,
        user_input: &str,
        embedder: &dyn Embedder,
        generator: &dyn Generator,
    ) -> Result<Reply> {
        self.history.push(ConversationMessage::user(user_input));
        match self.generate(user_input, embedder, generator) {
            Ok(reply) => {
                self.history
                    .push(ConversationMessage::assistant(reply.text()));
                Ok(reply)
            }
            Err(e) => {
                self.history.pop();
                Err(e)
            }
        }
    }

    fn generate(
        &self,
        user_input: &str,
        embedder: &dyn Embedder,
        generator: &dyn Generator,
    ) -> Result<Reply> {
        let grounding = match self.index {
            Some(index) if !index.is_empty() => {
                let fragments = search_index(
                    embedder,
                    &self.options.embedding_model,
                    index,
                    user_input,
                    self.options.top_k,
                )?;
                debug!(fragments = fragments.len(), "retrieved grounding");
                (!fragments.is_empty()).then(|| format_context(fragments))
            }
            _ => None,
        };

        let messages = build_messages(self.persona, grounding.as_deref(), &self.history);
        let reply = if self.options.structured {
            Reply::Structured(generate_structured(
                generator,
                &self.options.chat_model,
                &messages,
                self.options.max_retries,
            )?)
        } else {
            Reply::Plain(generate_text(
                generator,
                &self.options.chat_model,
                &messages,
            )?)
        };
        Ok(reply)
    }
}

/// Console rendering of a reply.
pub fn render_reply(reply: &Reply) -> String {
    let result = match reply {
        Reply::Plain(text) => return text.clone(),
        Reply::Structured(result) => result,
    };

    let mut out = result.reply.clone();
    if !result.follow_up_questions.is_empty() {
        out.push_str("\n\nFollow-up questions:");
        for (i, question) in result.follow_up_questions.iter().enumerate() {
            let _ = write!(out, "\n  {}. {}", i + 1, question);
        }
    }
    if let Some(note) = &result.safety_note {
        let _ = write!(out, "\n\nSafety note: {}", note);
    }
    let flags = result.raised_flags();
    if !flags.is_empty() {
        let _ = write!(out, "\n[flags: {}]", flags.join(", "));
    }
    out
}
