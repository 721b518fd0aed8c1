//! Schema-validated generation with corrective re-prompting.
//!
//! [`generate_structured`] calls the [`Generator`] with the response schema
//! hint and validates every reply with
//! [`parse_structured`]. A reply that fails validation earns one
//! corrective system message on a private copy of the conversation and
//! another attempt, up to `max_retries` extra attempts. Transport failures
//! are returned at once and never consume a retry.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result, ValidationError};
use crate::models::{ConversationMessage, StructuredResult};
use crate::structured::{parse_structured, response_schema};

/// Turns a conversation into a single reply.
///
/// When `schema` is given, the service should bias its output toward it;
/// callers must still validate.
pub trait Generator {
    fn chat(
        &self,
        model: &str,
        messages: &[ConversationMessage],
        schema: Option<&Value>,
    ) -> anyhow::Result<String>;
}

impl<G: Generator + ?Sized> Generator for &G {
    fn chat(
        &self,
        model: &str,
        messages: &[ConversationMessage],
        schema: Option<&Value>,
    ) -> anyhow::Result<String> {
        (**self).chat(model, messages, schema)
    }
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn chat(
        &self,
        model: &str,
        messages: &[ConversationMessage],
        schema: Option<&Value>,
    ) -> anyhow::Result<String> {
        (**self).chat(model, messages, schema)
    }
}

/// Default number of validation retries (three attempts in total).
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// System message appended after a reply fails validation.
pub fn corrective_message(err: &ValidationError) -> ConversationMessage {
    ConversationMessage::system(format!(
        "Your previous response could not be used: {err}. \
         Respond again with only a single JSON object with these fields: \
         \"reply\" (string), \"follow_up_questions\" (array of strings), \
         \"is_medical\", \"is_legal\", \"is_financial\", \"is_not_appropriate\" (booleans), \
         and optionally \"safety_note\" (string or null). Do not add any text outside the JSON."
    ))
}

/// Plain, unvalidated generation.
pub fn generate_text<G: Generator + ?Sized>(
    generator: &G,
    model: &str,
    messages: &[ConversationMessage],
) -> Result<String> {
    generator
        .chat(model, messages, None)
        .map_err(|e| Error::transport("generation", e))
}

/// Generate until a reply passes validation or `max_retries` is used up.
///
/// Makes at most `max_retries + 1` calls. `messages` is never modified.
///
/// # Errors
///
/// - [`Error::Transport`] as soon as the generator itself fails.
/// - [`Error::Generation`] with the last [`ValidationError`] once every
///   attempt produced an invalid reply.
pub fn generate_structured<G: Generator + ?Sized>(
    generator: &G,
    model: &str,
    messages: &[ConversationMessage],
    max_retries: u32,
) -> Result<StructuredResult> {
    let schema = response_schema();
    let mut working = messages.to_vec();
    let mut attempt: u32 = 0;

    loop {
        let raw = generator
            .chat(model, &working, Some(&schema))
            .map_err(|e| Error::transport("generation", e))?;

        match parse_structured(&raw) {
            Ok(result) => {
                if attempt > 0 {
                    info!(attempts = attempt + 1, "structured reply accepted after retry");
                } else {
                    debug!("structured reply accepted");
                }
                return Ok(result);
            }
            Err(err) if attempt == max_retries => {
                warn!(attempts = attempt + 1, error = %err, "structured reply rejected, giving up");
                return Err(Error::Generation {
                    attempts: attempt + 1,
                    last: err,
                });
            }
            Err(err) => {
                warn!(attempt = attempt + 1, error = %err, "structured reply rejected, retrying");
                working.push(corrective_message(&err));
                attempt += 1;
            }
        }
    }
}
