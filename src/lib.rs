//! # grounded-chat
//!
//! A persona chat assistant that grounds its answers in a local directory
//! of documents and forces the model to reply in a validated JSON shape.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  Loader    │──▶│ Chunk+Embed  │──▶│  in-memory   │
//! │ txt/md/pdf │   │  (one batch) │   │    index     │
//! └────────────┘   └──────────────┘   └──────┬───────┘
//!                                            │ top-k
//!                 ┌──────────────────────────┘
//!                 ▼
//!          ┌──────────────┐   ┌─────────────────────┐
//!          │   persona +  │──▶│ validate-or-retry   │──▶ structured reply
//!          │  grounding   │   │ generation (Ollama) │
//!          └──────────────┘   └─────────────────────┘
//! ```
//!
//! The algorithms live in [`grounded_chat_core`]; this crate adds the
//! configuration, document loading, Ollama clients, personas, and CLI.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`loader`] | Directory walk and text loading |
//! | [`extract`] | PDF text extraction |
//! | [`embedding`] | Embedding providers |
//! | [`llm`] | Ollama chat client |
//! | [`persona`] | Persona prompts and registry |
//! | [`grounding`] | Building the session index |
//! | [`session`] | Conversation turns and rendering |
//! | [`progress`] | Progress reporters |
//! | [`commands`] | CLI command implementations |

pub mod commands;
pub mod config;
pub mod embedding;
pub mod extract;
pub mod grounding;
pub mod http;
pub mod llm;
pub mod loader;
pub mod persona;
pub mod progress;
pub mod session;
