//! Embedding collaborator trait and vector helpers.
//!
//! Concrete providers (Ollama, disabled) live in the `grounded-chat`
//! app crate. Providers may fail for transport reasons; those failures
//! are wrapped into [`Error::Transport`](crate::Error::Transport) by the
//! callers in this crate and never retried here.

use anyhow::Result;

/// Turns text into fixed-length vectors.
///
/// Implementations must return exactly one vector per input, in input
/// order, all with the dimensionality of `model`.
pub trait Embedder {
    fn embed(&self, model: &str, inputs: &[String]) -> Result<Vec<Vec<f32>>>;
}

impl<E: Embedder + ?Sized> Embedder for &E {
    fn embed(&self, model: &str, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        (**self).embed(model, inputs)
    }
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn embed(&self, model: &str, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        (**self).embed(model, inputs)
    }
}

/// Dot product of two vectors.
///
/// Providers are expected to return unit-length embeddings, in which case
/// this equals cosine similarity. No normalization is applied here.
/// Callers check that lengths agree; extra components are ignored.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Euclidean length of a vector.
pub fn norm(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_unit_vectors() {
        let a = [1.0, 0.0, 0.0];
        let b = [0.0, 1.0, 0.0];
        assert_eq!(dot(&a, &a), 1.0);
        assert_eq!(dot(&a, &b), 0.0);
    }

    #[test]
    fn test_dot_not_normalized() {
        let a = [2.0, 0.0];
        let b = [3.0, 0.0];
        assert_eq!(dot(&a, &b), 6.0);
    }

    #[test]
    fn test_norm() {
        assert!((norm(&[3.0, 4.0]) - 5.0).abs() < 1e-6);
        assert_eq!(norm(&[]), 0.0);
    }
}
