//! # grounded-chat core
//!
//! I/O-free logic shared by the `gchat` binary and its tests: data models,
//! character-window chunking, the in-memory fragment index, dot-product
//! retrieval, context rendering, structured-output validation, and the
//! validate-or-retry generation loop.
//!
//! Embedding and generation services are reached only through the
//! [`Embedder`](embedding::Embedder) and [`Generator`](generate::Generator)
//! traits. This crate performs no filesystem or network access.

pub mod chunk;
pub mod context;
pub mod embedding;
pub mod error;
pub mod generate;
pub mod index;
pub mod models;
pub mod progress;
pub mod search;
pub mod structured;

pub use error::{Error, Result, ValidationError};
