//! Ollama chat client for non-streaming completions.

use anyhow::{anyhow, Result};
use grounded_chat_core::generate::Generator;
use grounded_chat_core::models::ConversationMessage;
use serde_json::{json, Value};

use crate::config::Config;
use crate::http;

/// Calls `POST /api/chat` with `stream: false`.
///
/// A response schema, when given, is sent as Ollama's `format` field.
pub struct OllamaChat {
    client: reqwest::blocking::Client,
    url: String,
    max_retries: u32,
}

impl OllamaChat {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: http::build_client(&config.ollama)?,
            url: format!("{}/api/chat", config.ollama.url.trim_end_matches('/')),
            max_retries: config.ollama.max_retries,
        })
    }
}

impl Generator for OllamaChat {
    fn chat(
        &self,
        model: &str,
        messages: &[ConversationMessage],
        schema: Option<&Value>,
    ) -> Result<String> {
        let body = chat_request(model, messages, schema);
        let json = http::post_json(&self.client, &self.url, &body, self.max_retries)?;
        parse_chat_response(&json)
    }
}

fn chat_request(model: &str, messages: &[ConversationMessage], schema: Option<&Value>) -> Value {
    let mut body = json!({
        "model": model,
        "messages": messages,
        "stream": false,
    });
    if let Some(schema) = schema {
        body["format"] = schema.clone();
    }
    body
}

fn parse_chat_response(json: &Value) -> Result<String> {
    json.get("message")
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Invalid Ollama response: missing message.content"))
}
