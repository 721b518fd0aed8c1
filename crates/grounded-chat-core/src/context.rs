//! Render retrieved fragments as a grounding block for the model.

use crate::models::IndexedFragment;

pub const CONTEXT_HEADER: &str = "Use the following context if relevant:";

/// Header line, then a `- Source:` line and the raw content per fragment.
pub fn format_context<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = &'a IndexedFragment>,
{
    let mut lines = vec![CONTEXT_HEADER.to_string()];
    for fragment in fragments {
        lines.push(format!("- Source: {}", fragment.source_id));
        lines.push(fragment.content.clone());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_in_input_order() {
        let a = IndexedFragment {
            content: "alpha text".into(),
            source_id: "docs/a.md".into(),
            embedding: vec![],
        };
        let b = IndexedFragment {
            content: "beta text".into(),
            source_id: "docs/b.txt".into(),
            embedding: vec![],
        };
        assert_eq!(
            format_context([&b, &a]),
            "Use the following context if relevant:\n- Source: docs/b.txt\nbeta text\n- Source: docs/a.md\nalpha text"
        );
    }

    #[test]
    fn test_no_fragments_header_only() {
        assert_eq!(format_context(Vec::<&IndexedFragment>::new()), CONTEXT_HEADER);
    }
}
