//! Progress events emitted while loading and indexing documents.
//!
//! Reporters are always invoked on the calling thread. Any `Fn(&str)`
//! closure is a reporter and receives the human-readable rendering of
//! each event.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A matching file was found and is about to be read.
    Loading { path: String },
    /// The batched embedding request for `fragments` items is starting.
    Embedding { fragments: usize },
    /// The embedding request returned.
    EmbeddingComplete,
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Loading { path } => write!(f, "Loading {}...", path),
            ProgressEvent::Embedding { fragments } => {
                write!(f, "Embedding {} chunks...", fragments)
            }
            ProgressEvent::EmbeddingComplete => write!(f, "Embedding complete."),
        }
    }
}

pub trait ProgressReporter {
    fn report(&self, event: &ProgressEvent);
}

impl<F: Fn(&str)> ProgressReporter for F {
    fn report(&self, event: &ProgressEvent) {
        self(&event.to_string())
    }
}

/// Forward `event` to `reporter` if one was supplied.
pub fn notify(reporter: Option<&dyn ProgressReporter>, event: ProgressEvent) {
    if let Some(reporter) = reporter {
        reporter.report(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn closure_receives_rendered_lines() {
        let seen = RefCell::new(Vec::new());
        let reporter = |line: &str| seen.borrow_mut().push(line.to_string());
        notify(Some(&reporter), ProgressEvent::Loading { path: "docs/a.md".into() });
        notify(Some(&reporter), ProgressEvent::Embedding { fragments: 12 });
        notify(Some(&reporter), ProgressEvent::EmbeddingComplete);
        assert_eq!(
            *seen.borrow(),
            vec![
                "Loading docs/a.md...",
                "Embedding 12 chunks...",
                "Embedding complete."
            ]
        );
    }

    #[test]
    fn absent_reporter_is_noop() {
        notify(None, ProgressEvent::EmbeddingComplete);
    }
}
