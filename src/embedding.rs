//! Embedding providers.
//!
//! - **[`OllamaEmbedder`]**: calls a local Ollama instance's `/api/embed` endpoint
//!   with all inputs in one request.
//! - **[`DisabledEmbedder`]**: always fails; used when retrieval is turned off.
//!
//! Use [`create_embedder`] to pick one from the configuration.

use anyhow::{bail, Result};
use grounded_chat_core::embedding::Embedder;

use crate::config::Config;
use crate::http;

/// Build the embedder selected by `embedding.provider`.
pub fn create_embedder(config: &Config) -> Result<Box<dyn Embedder>> {
    match config.embedding.provider.as_str() {
        "ollama" => Ok(Box::new(OllamaEmbedder::new(config)?)),
        "disabled" => Ok(Box::new(DisabledEmbedder)),
        other => bail!("Unknown embedding provider: {}", other),
    }
}

// ============ Disabled Provider ============

pub struct DisabledEmbedder;

impl Embedder for DisabledEmbedder {
    fn embed(&self, _model: &str, _inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        bail!("Embedding provider is disabled")
    }
}

// ============ Ollama Provider ============

/// Embedding provider using a local Ollama instance.
///
/// Requires Ollama to be running with an embedding model pulled
/// (e.g. `ollama pull nomic-embed-text`).
pub struct OllamaEmbedder {
    client: reqwest::blocking::Client,
    url: String,
    max_retries: u32,
}

impl OllamaEmbedder {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: http::build_client(&config.ollama)?,
            url: format!("{}/api/embed", config.ollama.url.trim_end_matches('/')),
            max_retries: config.ollama.max_retries,
        })
    }
}

impl Embedder for OllamaEmbedder {
    fn embed(&self, model: &str, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        let body = serde_json::json!({
            "model": model,
            "input": inputs,
        });
        let json = http::post_json(&self.client, &self.url, &body, self.max_retries)?;
        parse_ollama_response(&json)
    }
}

fn parse_ollama_response(json: &serde_json::Value) -> Result<Vec<Vec<f32>>> {
    let embeddings = json
        .get("embeddings")
        .and_then(|e| e.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: missing embeddings array"))?;

    let mut result = Vec::with_capacity(embeddings.len());

    for embedding in embeddings {
        let vec = embedding
            .as_array()
            .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: embedding is not an array"))?
            .iter()
            .map(|v| {
                v.as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: non-numeric component"))
            })
            .collect::<Result<Vec<f32>>>()?;
        result.push(vec);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_embeddings_in_order() {
        let json = json!({"model": "nomic-embed-text", "embeddings": [[0.1, 0.2], [0.3, -0.4]]});
        let vecs = parse_ollama_response(&json).unwrap();
        assert_eq!(vecs, vec![vec![0.1f32, 0.2], vec![0.3, -0.4]]);
    }

    #[test]
    fn missing_embeddings_is_error() {
        let err = parse_ollama_response(&json!({"error": "model not found"})).unwrap_err();
        assert!(err.to_string().contains("missing embeddings"));
    }

    #[test]
    fn non_numeric_component_is_error() {
        assert!(parse_ollama_response(&json!({"embeddings": [[0.1, "x"]]})).is_err());
    }

    #[test]
    fn disabled_provider_fails() {
        assert!(DisabledEmbedder.embed("m", &["hi".to_string()]).is_err());
    }

    #[test]
    fn factory_selects_provider() {
        let mut config = Config::default();
        config.embedding.provider = "disabled".into();
        let embedder = create_embedder(&config).unwrap();
        assert!(embedder.embed("m", &[]).is_err());

        config.embedding.provider = "openai".into();
        assert!(create_embedder(&config).is_err());
    }
}
