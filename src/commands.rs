//! Command implementations behind the `gchat` CLI.

use anyhow::{bail, Result};
use grounded_chat_core::embedding::Embedder;
use grounded_chat_core::generate::Generator;
use grounded_chat_core::progress::ProgressReporter;
use grounded_chat_core::search::search_scored;
use std::io::{BufRead, Write};
use std::path::Path;

use crate::config::Config;
use crate::grounding::{build_grounding_index, load_configured_documents, preview_fragments};
use crate::persona::PersonaRegistry;
use crate::session::{render_reply, ChatSession, SessionOptions};

/// Characters of fragment content shown per search hit.
const SNIPPET_CHARS: usize = 240;

pub fn run_personas(registry: &PersonaRegistry) -> Result<()> {
    for persona in registry.iter() {
        println!("{:<10} {}", persona.key(), persona.title());
    }
    Ok(())
}

/// Load and chunk (and unless `dry_run`, embed) the documents directory.
pub fn run_index(
    config: &Config,
    root: Option<&Path>,
    dry_run: bool,
    embedder: &dyn Embedder,
    progress: Option<&dyn ProgressReporter>,
) -> Result<()> {
    let Some(root) = root else {
        bail!("No documents directory configured. Set [documents] root or pass --docs.");
    };
    if !root.is_dir() {
        bail!("Documents directory does not exist: {}", root.display());
    }

    if dry_run {
        let docs = load_configured_documents(config, Some(root), progress)?.unwrap_or_default();
        let fragments = preview_fragments(config, &docs)?;
        println!("documents: {}", docs.len());
        println!("fragments: {}", fragments.len());
        println!("dry run: nothing embedded");
        return Ok(());
    }

    if !config.embedding.is_enabled() {
        bail!("Indexing requires embeddings. Set [embedding] provider in config, or use --dry-run.");
    }
    let index = build_grounding_index(config, Some(root), embedder, progress)?.unwrap_or_default();
    println!("documents: {}", index.source_count());
    println!("fragments: {}", index.len());
    println!("dimensions: {}", index.dims());
    println!("model: {}", config.embedding.model);
    Ok(())
}

pub fn run_search(
    config: &Config,
    root: Option<&Path>,
    query: &str,
    top_k: Option<i64>,
    embedder: &dyn Embedder,
    progress: Option<&dyn ProgressReporter>,
) -> Result<()> {
    if query.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }
    if !config.embedding.is_enabled() {
        bail!("Search requires embeddings. Set [embedding] provider in config.");
    }
    if root.is_none() {
        bail!("No documents directory configured. Set [documents] root or pass --docs.");
    }

    let index = build_grounding_index(config, root, embedder, progress)?.unwrap_or_default();
    let top_k = top_k.unwrap_or(config.retrieval.top_k);
    let results = search_scored(embedder, &config.embedding.model, &index, query, top_k)?;

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, hit) in results.iter().enumerate() {
        let snippet: String = hit
            .fragment
            .content
            .chars()
            .take(SNIPPET_CHARS)
            .collect::<String>()
            .replace('\n', " ");
        println!("{}. [{:.4}] {}", i + 1, hit.score, hit.fragment.source_id);
        println!("    {}", snippet);
    }
    Ok(())
}

/// Interactive loop: one line per turn, an empty line exits.
#[allow(clippy::too_many_arguments)]
pub fn run_chat(
    config: &Config,
    registry: &PersonaRegistry,
    persona_key: &str,
    root: Option<&Path>,
    structured: bool,
    embedder: &dyn Embedder,
    generator: &dyn Generator,
    progress: Option<&dyn ProgressReporter>,
) -> Result<()> {
    let persona = registry.get(persona_key)?;
    let index = build_grounding_index(config, root, embedder, progress)?;

    let options = SessionOptions {
        chat_model: config.chat.model.clone(),
        embedding_model: config.embedding.model.clone(),
        top_k: config.retrieval.top_k,
        structured,
        max_retries: config.chat.max_retries,
    };
    let mut session = ChatSession::new(persona, index.as_ref(), options);

    println!("Persona: {}", persona.title());
    if let Some(index) = &index {
        println!(
            "Grounding: {} fragments from {} documents",
            index.len(),
            index.source_count()
        );
    }
    println!("Type your message. Press Enter on an empty line to exit.");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let input = line?;
        let input = input.trim();
        if input.is_empty() {
            break;
        }

        match session.respond(input, embedder, generator) {
            Ok(reply) => println!("{}", render_reply(&reply)),
            Err(e) => eprintln!("Error: {:#}", e),
        }
    }
    Ok(())
}
