//! Typed errors for the core pipeline.
//!
//! Every failure the core can surface is one of the [`Error`] variants.
//! Only [`Error::Validation`] is ever recovered from, and only inside
//! [`generate_structured`](crate::generate::generate_structured).

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid parameters or a missing optional capability.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A collaborator broke its output contract (vector count or dims).
    #[error("collaborator integrity error: {0}")]
    CollaboratorIntegrity(String),

    /// The embedding or generation service call itself failed.
    #[error("{collaborator} call failed")]
    Transport {
        collaborator: &'static str,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Structured generation gave up after `attempts` tries.
    #[error("structured generation failed after {attempts} attempt(s)")]
    Generation {
        attempts: u32,
        #[source]
        last: ValidationError,
    },
}

impl Error {
    pub fn transport(collaborator: &'static str, err: anyhow::Error) -> Self {
        Error::Transport {
            collaborator,
            source: err.into(),
        }
    }
}

/// Why a candidate structured response was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("field '{field}' must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}
