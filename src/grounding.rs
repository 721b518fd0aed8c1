//! Builds the retrieval index for a session from the configured documents.

use anyhow::{Context, Result};
use grounded_chat_core::embedding::Embedder;
use grounded_chat_core::index::{build_index, collect_fragments, FragmentIndex};
use grounded_chat_core::models::{Document, Fragment};
use grounded_chat_core::progress::ProgressReporter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::loader::load_documents;

/// Pick the documents directory: CLI override first, then config.
pub fn documents_root(config: &Config, override_dir: Option<&Path>) -> Option<PathBuf> {
    override_dir
        .map(Path::to_path_buf)
        .or_else(|| config.documents.root.clone())
}

/// Load documents, or `None` when no usable directory is configured.
///
/// A configured directory that does not exist only logs a warning; the
/// caller then runs without grounding.
pub fn load_configured_documents(
    config: &Config,
    root: Option<&Path>,
    progress: Option<&dyn ProgressReporter>,
) -> Result<Option<Vec<Document>>> {
    let Some(root) = root else {
        return Ok(None);
    };
    if !root.is_dir() {
        warn!(root = %root.display(), "documents directory not found; continuing without grounding");
        return Ok(None);
    }
    let docs = load_documents(root, &config.documents, progress)?;
    Ok(Some(docs))
}

/// Chunk documents without contacting the embedder.
pub fn preview_fragments(config: &Config, docs: &[Document]) -> Result<Vec<Fragment>> {
    Ok(collect_fragments(docs, config.chunking.params())?)
}

/// Build the grounding index, or `None` if retrieval is unavailable.
pub fn build_grounding_index(
    config: &Config,
    root: Option<&Path>,
    embedder: &dyn Embedder,
    progress: Option<&dyn ProgressReporter>,
) -> Result<Option<FragmentIndex>> {
    if !config.embedding.is_enabled() {
        return Ok(None);
    }
    let Some(docs) = load_configured_documents(config, root, progress)? else {
        return Ok(None);
    };
    let index = build_index(
        embedder,
        &config.embedding.model,
        &docs,
        config.chunking.params(),
        progress,
    )
    .with_context(|| "Failed to build document index")?;
    info!(
        documents = docs.len(),
        fragments = index.len(),
        model = index.model(),
        "document index ready"
    );
    Ok(Some(index))
}
