//! Brute-force dot-product retrieval over a [`FragmentIndex`].
//!
//! # Scoring
//!
//! 1. Embed the query with a single-item request.
//! 2. Score every fragment as `dot(fragment.embedding, query)`.
//! 3. Stable sort by score descending, so equal scores keep index order.
//! 4. Truncate to `top_k`.
//!
//! Scores are raw dot products. They equal cosine similarity only when the
//! embedding provider returns unit-length vectors.

use tracing::debug;

use crate::embedding::{dot, Embedder};
use crate::error::{Error, Result};
use crate::index::FragmentIndex;
use crate::models::{IndexedFragment, ScoredFragment};

/// Rank `index` against `query` and return the best `top_k` with scores.
///
/// An empty index or `top_k <= 0` returns immediately without calling the
/// embedder.
///
/// # Errors
///
/// - [`Error::Configuration`] if `model` is not the model the index was
///   built with.
/// - [`Error::Transport`] if the embedding call fails.
/// - [`Error::CollaboratorIntegrity`] if the embedder returns no vector or
///   a vector whose length differs from the index's dimensionality.
pub fn search_scored<'a, E: Embedder + ?Sized>(
    embedder: &E,
    model: &str,
    index: &'a FragmentIndex,
    query: &str,
    top_k: i64,
) -> Result<Vec<ScoredFragment<'a>>> {
    if index.is_empty() || top_k <= 0 {
        return Ok(Vec::new());
    }
    if index.model() != model {
        return Err(Error::Configuration(format!(
            "index was built with embedding model '{}', cannot search it with '{}'",
            index.model(),
            model
        )));
    }

    let query_vec = embed_query(embedder, model, query)?;
    if query_vec.len() != index.dims() {
        return Err(Error::CollaboratorIntegrity(format!(
            "query embedding has {} dimensions, index has {}",
            query_vec.len(),
            index.dims()
        )));
    }

    let mut scored: Vec<ScoredFragment<'a>> = index
        .fragments()
        .iter()
        .map(|fragment| ScoredFragment {
            score: dot(&fragment.embedding, &query_vec),
            fragment,
        })
        .collect();
    rank(&mut scored);
    scored.truncate(top_k as usize);

    debug!(
        candidates = index.len(),
        returned = scored.len(),
        "ranked fragments"
    );
    Ok(scored)
}

/// Like [`search_scored`], returning only the fragments.
pub fn search_index<'a, E: Embedder + ?Sized>(
    embedder: &E,
    model: &str,
    index: &'a FragmentIndex,
    query: &str,
    top_k: i64,
) -> Result<Vec<&'a IndexedFragment>> {
    Ok(search_scored(embedder, model, index, query, top_k)?
        .into_iter()
        .map(|s| s.fragment)
        .collect())
}

/// Sort by score descending. `sort_by` is stable, so ties keep input order.
///
/// NaN scores rank below every number, so a single bad vector cannot
/// disturb the order of the others.
pub fn rank(scored: &mut [ScoredFragment<'_>]) {
    scored.sort_by(|a, b| rank_key(b.score).total_cmp(&rank_key(a.score)));
}

fn rank_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else if score == 0.0 {
        // -0.0 and 0.0 tie
        0.0
    } else {
        score
    }
}

fn embed_query<E: Embedder + ?Sized>(embedder: &E, model: &str, query: &str) -> Result<Vec<f32>> {
    let vectors = embedder
        .embed(model, &[query.to_string()])
        .map_err(|e| Error::transport("embedding", e))?;
    if vectors.len() != 1 {
        return Err(Error::CollaboratorIntegrity(format!(
            "embedder returned {} vectors for 1 query",
            vectors.len()
        )));
    }
    Ok(vectors.into_iter().next().unwrap_or_default())
}
