//! Heading breadcrumbs for a position in a document.

use serde::{Deserialize, Serialize};

/// Separator between breadcrumb segments.
pub const CONTEXT_SEP: &str = " > ";

/// A heading from the document outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub title: String,
    pub level: u8,
    /// Byte offset of the heading line.
    pub start: usize,
}

impl Heading {
    pub fn new(title: impl Into<String>, level: u8, start: usize) -> Self {
        Self {
            title: title.into(),
            level,
            start,
        }
    }
}

/// Breadcrumb of `path` followed by the headings whose scope contains
/// `position`.
///
/// `headings` must be in document order. A heading closes every open heading
/// at its own level or deeper, so siblings replace each other rather than
/// accumulate. With no outline the breadcrumb is just the path.
pub fn context_at_index(path: &str, headings: Option<&[Heading]>, position: usize) -> String {
    let Some(headings) = headings else {
        return path.to_string();
    };

    let mut stack: Vec<&Heading> = Vec::new();
    for heading in headings.iter().take_while(|h| h.start < position) {
        while stack.last().is_some_and(|open| open.level >= heading.level) {
            stack.pop();
        }
        stack.push(heading);
    }

    std::iter::once(path)
        .chain(stack.iter().map(|h| h.title.as_str()))
        .collect::<Vec<_>>()
        .join(CONTEXT_SEP)
}
