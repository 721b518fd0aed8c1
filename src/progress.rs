//! Loading and indexing progress reporting.
//!
//! Reports observable progress while documents are read and embedded so
//! users see what is being scanned and when the index is ready. Progress
//! is emitted on **stderr** so stdout remains parseable for scripts.

use grounded_chat_core::progress::{ProgressEvent, ProgressReporter};
use std::io::Write;

/// Human-friendly progress on stderr: "Loading docs/a.md...".
pub struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, event: &ProgressEvent) {
        let line = format!("{}\n", event);
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl ProgressReporter for JsonProgress {
    fn report(&self, event: &ProgressEvent) {
        if let Ok(line) = serde_json::to_string(&event_json(event)) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

fn event_json(event: &ProgressEvent) -> serde_json::Value {
    match event {
        ProgressEvent::Loading { path } => serde_json::json!({
            "event": "progress",
            "phase": "loading",
            "path": path
        }),
        ProgressEvent::Embedding { fragments } => serde_json::json!({
            "event": "progress",
            "phase": "embedding",
            "fragments": fragments
        }),
        ProgressEvent::EmbeddingComplete => serde_json::json!({
            "event": "progress",
            "phase": "embedded"
        }),
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _event: &ProgressEvent) {}
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Build a reporter for this mode.
    pub fn reporter(&self) -> Box<dyn ProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
