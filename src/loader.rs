use anyhow::{bail, Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use grounded_chat_core::models::Document;
use grounded_chat_core::progress::{notify, ProgressEvent, ProgressReporter};
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::DocumentsConfig;
use crate::extract;

/// Walk `root` and load every matching file as a [`Document`].
///
/// Source ids are paths relative to `root`. Files that are blank after
/// trimming are skipped; results are sorted by source id.
pub fn load_documents(
    root: &Path,
    config: &DocumentsConfig,
    progress: Option<&dyn ProgressReporter>,
) -> Result<Vec<Document>> {
    if !root.is_dir() {
        bail!("Documents directory does not exist: {}", root.display());
    }

    let include_set = build_globset(&config.include_globs)?;

    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/target/**".to_string(),
        "**/node_modules/**".to_string(),
    ];
    default_excludes.extend(config.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut docs = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(config.follow_symlinks)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().replace('\\', "/");

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }

        notify(
            progress,
            ProgressEvent::Loading {
                path: path.display().to_string(),
            },
        );
        let text = read_text(path)?;
        if text.trim().is_empty() {
            debug!(path = %path.display(), "skipping blank document");
            continue;
        }
        docs.push(Document::new(rel_str, text));
    }

    // Sort for deterministic index order
    docs.sort_by(|a, b| a.source_id.cmp(&b.source_id));
    debug!(documents = docs.len(), root = %root.display(), "loaded documents");

    Ok(docs)
}

/// Read one file: PDFs through the extractor, everything else as UTF-8.
pub fn read_text(path: &Path) -> Result<String> {
    if is_pdf(path) {
        return extract::extract_pdf(path);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(
            GlobBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("Invalid glob pattern: {}", pattern))?,
        );
    }
    Ok(builder.build()?)
}
