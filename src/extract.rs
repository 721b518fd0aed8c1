//! Text extraction for non-plain-text documents.
//!
//! Only PDF is supported, and only when the crate is built with the `pdf`
//! feature (on by default). Without it, extraction fails with a
//! configuration error naming the missing capability.

use std::path::Path;

/// Extract the text of every page, joined and trimmed.
#[cfg(feature = "pdf")]
pub fn extract_pdf(path: &Path) -> anyhow::Result<String> {
    use anyhow::Context;

    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let text = pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| anyhow::anyhow!("PDF extraction failed for {}: {}", path.display(), e))?;
    Ok(text.trim().to_string())
}

#[cfg(not(feature = "pdf"))]
pub fn extract_pdf(path: &Path) -> anyhow::Result<String> {
    Err(grounded_chat_core::Error::Configuration(format!(
        "PDF support is not available in this build (rebuild with --features pdf); cannot load {}",
        path.display()
    ))
    .into())
}
