//! In-memory fragment index.
//!
//! [`build_index`] chunks every document, embeds all fragments with a
//! single batched request, and returns a [`FragmentIndex`] that remembers
//! which model produced its vectors and their dimensionality. The index is
//! read-only once built.

use tracing::debug;

use crate::chunk::{chunk_document, ChunkParams};
use crate::embedding::{norm, Embedder};
use crate::error::{Error, Result};
use crate::models::{Document, Fragment, IndexedFragment};
use crate::progress::{notify, ProgressEvent, ProgressReporter};

/// Ordered, immutable collection of embedded fragments.
///
/// Order is document order, then chunk order. Retrieval uses it as the
/// tie-break for equal scores.
#[derive(Debug, Clone, Default)]
pub struct FragmentIndex {
    model: String,
    dims: usize,
    fragments: Vec<IndexedFragment>,
}

impl FragmentIndex {
    /// Assemble an index from already-embedded fragments.
    ///
    /// Every embedding must have the same length.
    pub fn from_fragments(
        model: impl Into<String>,
        fragments: Vec<IndexedFragment>,
    ) -> Result<Self> {
        let dims = fragments.first().map(|f| f.embedding.len()).unwrap_or(0);
        if let Some(bad) = fragments.iter().find(|f| f.embedding.len() != dims) {
            return Err(Error::CollaboratorIntegrity(format!(
                "embedding dimensionality mismatch: expected {}, got {} for a fragment of {}",
                dims,
                bad.embedding.len(),
                bad.source_id
            )));
        }
        Ok(Self {
            model: model.into(),
            dims,
            fragments,
        })
    }

    /// Embedding model the vectors came from.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Vector dimensionality, `0` for an empty index.
    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn fragments(&self) -> &[IndexedFragment] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Number of distinct source ids, in index order.
    pub fn source_count(&self) -> usize {
        let mut count = 0;
        let mut last: Option<&str> = None;
        for f in &self.fragments {
            if last != Some(f.source_id.as_str()) {
                count += 1;
                last = Some(f.source_id.as_str());
            }
        }
        count
    }
}

/// Chunk `docs` in order without embedding anything.
pub fn collect_fragments(docs: &[Document], params: ChunkParams) -> Result<Vec<Fragment>> {
    params.validate()?;
    let mut fragments = Vec::new();
    for doc in docs {
        fragments.extend(chunk_document(doc, params)?);
    }
    Ok(fragments)
}

/// Chunk and embed `docs` into a [`FragmentIndex`].
///
/// Makes at most one embedding call. When the documents yield no
/// fragments the embedder is never contacted and the index is empty.
///
/// # Errors
///
/// - [`Error::Configuration`] for invalid chunk parameters.
/// - [`Error::Transport`] if the embedding call fails.
/// - [`Error::CollaboratorIntegrity`] if the embedder returns a different
///   number of vectors than inputs, or vectors of differing lengths.
pub fn build_index<E: Embedder + ?Sized>(
    embedder: &E,
    model: &str,
    docs: &[Document],
    params: ChunkParams,
    progress: Option<&dyn ProgressReporter>,
) -> Result<FragmentIndex> {
    let fragments = collect_fragments(docs, params)?;
    debug!(
        documents = docs.len(),
        fragments = fragments.len(),
        "chunked documents"
    );
    if fragments.is_empty() {
        return Ok(FragmentIndex {
            model: model.to_string(),
            ..FragmentIndex::default()
        });
    }

    notify(
        progress,
        ProgressEvent::Embedding {
            fragments: fragments.len(),
        },
    );
    let inputs: Vec<String> = fragments.iter().map(|f| f.content.clone()).collect();
    let embeddings = embedder
        .embed(model, &inputs)
        .map_err(|e| Error::transport("embedding", e))?;
    notify(progress, ProgressEvent::EmbeddingComplete);

    if embeddings.len() != fragments.len() {
        return Err(Error::CollaboratorIntegrity(format!(
            "embedder returned {} vectors for {} inputs",
            embeddings.len(),
            fragments.len()
        )));
    }

    if let Some(first) = embeddings.first() {
        let n = norm(first);
        if (n - 1.0).abs() > 1e-3 {
            debug!(norm = n, "embeddings are not unit length; scores are raw dot products");
        }
    }

    let indexed = fragments
        .into_iter()
        .zip(embeddings)
        .map(|(fragment, embedding)| IndexedFragment {
            content: fragment.content,
            source_id: fragment.source_id,
            embedding,
        })
        .collect();
    FragmentIndex::from_fragments(model, indexed)
}
