//! # grounded-chat CLI (`gchat`)
//!
//! The `gchat` binary runs a persona chat against a local Ollama server,
//! optionally grounding each answer in a directory of documents.
//!
//! ## Usage
//!
//! ```bash
//! gchat --config ./config/gchat.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `gchat chat` | Interactive chat loop |
//! | `gchat index` | Load, chunk, and embed the documents directory |
//! | `gchat search "<query>"` | Show the fragments retrieval would inject |
//! | `gchat personas` | List available personas |
//!
//! ## Examples
//!
//! ```bash
//! # Chat as the educator persona, grounded in ./docs
//! gchat chat --persona educator --docs ./docs
//!
//! # Count documents and fragments without embedding
//! gchat index --docs ./docs --dry-run
//!
//! # Inspect retrieval for a question
//! gchat search "bedtime routine" --docs ./docs --top-k 5
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use grounded_chat::commands;
use grounded_chat::config::{self, Config};
use grounded_chat::embedding::create_embedder;
use grounded_chat::grounding::documents_root;
use grounded_chat::llm::OllamaChat;
use grounded_chat::persona::PersonaRegistry;
use grounded_chat::progress::ProgressMode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// grounded-chat: a persona chat assistant with local document grounding
/// and schema-validated replies.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. Without it, `./config/gchat.toml` is used if present and built-in
/// defaults otherwise.
#[derive(Parser)]
#[command(
    name = "gchat",
    about = "grounded-chat: persona chat with document grounding and validated JSON replies",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat.
    ///
    /// Each line you type is one turn. Press Enter on an empty line to exit.
    Chat {
        /// Persona key (see `gchat personas`). Defaults to `chat.persona`.
        #[arg(long)]
        persona: Option<String>,

        /// Documents directory to ground answers in. Defaults to `documents.root`.
        #[arg(long)]
        docs: Option<PathBuf>,

        /// Plain text replies instead of validated structured output.
        #[arg(long)]
        plain: bool,

        /// Progress output while indexing: human, json, or off.
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,
    },

    /// Load, chunk, and embed the documents directory and print counts.
    Index {
        /// Documents directory. Defaults to `documents.root`.
        #[arg(long)]
        docs: Option<PathBuf>,

        /// Dry run: load and chunk only, without calling the embedding service.
        #[arg(long)]
        dry_run: bool,

        /// Progress output: human, json, or off.
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,
    },

    /// Rank document fragments against a query.
    Search {
        /// The search query string.
        query: String,

        /// Documents directory. Defaults to `documents.root`.
        #[arg(long)]
        docs: Option<PathBuf>,

        /// Maximum number of fragments to return. Defaults to `retrieval.top_k`.
        #[arg(long)]
        top_k: Option<i64>,

        /// Progress output: human, json, or off.
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,
    },

    /// List available personas.
    Personas,
}

const DEFAULT_CONFIG_PATH: &str = "./config/gchat.toml";

fn resolve_config(explicit: Option<&PathBuf>) -> Result<Config> {
    match explicit {
        Some(path) => config::load_config(path),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                config::load_config(&default_path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = resolve_config(cli.config.as_ref())?;
    let registry = PersonaRegistry::with_builtins();

    match cli.command {
        Commands::Chat {
            persona,
            docs,
            plain,
            progress,
        } => {
            let embedder = create_embedder(&cfg)?;
            let generator = OllamaChat::new(&cfg)?;
            let reporter = progress
                .unwrap_or_else(ProgressMode::default_for_tty)
                .reporter();
            let root = documents_root(&cfg, docs.as_deref());
            let persona_key = persona.unwrap_or_else(|| cfg.chat.persona.clone());
            commands::run_chat(
                &cfg,
                &registry,
                &persona_key,
                root.as_deref(),
                cfg.chat.structured && !plain,
                embedder.as_ref(),
                &generator,
                Some(reporter.as_ref()),
            )?;
        }
        Commands::Index {
            docs,
            dry_run,
            progress,
        } => {
            let embedder = create_embedder(&cfg)?;
            let reporter = progress
                .unwrap_or_else(ProgressMode::default_for_tty)
                .reporter();
            let root = documents_root(&cfg, docs.as_deref());
            commands::run_index(
                &cfg,
                root.as_deref(),
                dry_run,
                embedder.as_ref(),
                Some(reporter.as_ref()),
            )?;
        }
        Commands::Search {
            query,
            docs,
            top_k,
            progress,
        } => {
            let embedder = create_embedder(&cfg)?;
            let reporter = progress
                .unwrap_or_else(ProgressMode::default_for_tty)
                .reporter();
            let root = documents_root(&cfg, docs.as_deref());
            commands::run_search(
                &cfg,
                root.as_deref(),
                &query,
                top_k,
                embedder.as_ref(),
                Some(reporter.as_ref()),
            )?;
        }
        Commands::Personas => {
            commands::run_personas(&registry)?;
        }
    }

    Ok(())
}
