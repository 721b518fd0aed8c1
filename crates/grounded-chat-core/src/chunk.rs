//! Sliding-window text chunker.
//!
//! Splits document text into overlapping fragments of at most `max_chars`
//! characters. Windows start at offset 0 and advance by a stride of
//! `max_chars - overlap`, so consecutive windows share exactly `overlap`
//! characters of the untrimmed source text.
//!
//! # Algorithm
//!
//! 1. Reject `max_chars == 0` and `overlap >= max_chars`.
//! 2. Slide a window of width `max_chars` across the text; the last window
//!    may be shorter.
//! 3. Trim each window and keep it only if something remains.
//!
//! Offsets count Unicode scalar values, never bytes, so a window never
//! splits a multi-byte character.
//!
//! # Example
//!
//! ```rust
//! use grounded_chat_core::chunk::chunk_text;
//!
//! let chunks = chunk_text("abcdefghij", 4, 1).unwrap();
//! assert_eq!(chunks, vec!["abcd", "defg", "ghij", "j"]);
//! ```

use std::ops::Range;

use crate::error::{Error, Result};
use crate::models::{Document, Fragment};

pub const DEFAULT_MAX_CHARS: usize = 800;
pub const DEFAULT_OVERLAP: usize = 120;

/// Window size and overlap, both in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkParams {
    pub max_chars: usize,
    pub overlap: usize,
}

impl ChunkParams {
    pub fn new(max_chars: usize, overlap: usize) -> Result<Self> {
        let params = Self { max_chars, overlap };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_chars == 0 {
            return Err(Error::Configuration("max_chars must be > 0".into()));
        }
        if self.overlap >= self.max_chars {
            return Err(Error::Configuration(format!(
                "overlap ({}) must be smaller than max_chars ({})",
                self.overlap, self.max_chars
            )));
        }
        Ok(())
    }

    fn stride(&self) -> usize {
        self.max_chars - self.overlap
    }
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

/// Byte ranges of the untrimmed windows the chunker cuts from `text`.
///
/// Ranges always fall on char boundaries and are returned in order.
pub fn window_spans(text: &str, max_chars: usize, overlap: usize) -> Result<Vec<Range<usize>>> {
    let params = ChunkParams::new(max_chars, overlap)?;

    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = boundaries.len() - 1;

    let mut spans = Vec::new();
    let mut start = 0;
    while start < char_len {
        let end = (start + params.max_chars).min(char_len);
        spans.push(boundaries[start]..boundaries[end]);
        start += params.stride();
    }
    Ok(spans)
}

/// Split `text` into trimmed, non-empty fragments in document order.
pub fn chunk_text(text: &str, max_chars: usize, overlap: usize) -> Result<Vec<String>> {
    let spans = window_spans(text, max_chars, overlap)?;
    Ok(spans
        .into_iter()
        .map(|span| text[span].trim())
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect())
}

/// Chunk a document and tag every fragment with its source id.
pub fn chunk_document(doc: &Document, params: ChunkParams) -> Result<Vec<Fragment>> {
    Ok(chunk_text(&doc.text, params.max_chars, params.overlap)?
        .into_iter()
        .map(|content| Fragment {
            content,
            source_id: doc.source_id.clone(),
        })
        .collect())
}
