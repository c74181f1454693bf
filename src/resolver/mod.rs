//! Citation content resolver shared by the chat, search and query-log views.
//!
//! `path` -> `classify` -> (`tabular`) -> `render`, with `selector` tracking
//! which single document is expanded in a view.

pub mod classify;
pub mod path;
pub mod render;
pub mod selector;
pub mod tabular;

pub use classify::{classify, ContentKind};
pub use path::normalize;
pub use render::PreviewSizing;
pub use selector::{Selector, Transition};
pub use tabular::TabularRow;

/// A rendered document, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub path: String,
    pub kind: ContentKind,
    pub body: String,
}

impl Preview {
    pub fn build(path: &str, content: &str, rows: &[TabularRow], sizing: PreviewSizing) -> Self {
        let kind = classify(path);
        Self {
            path: path.to_string(),
            kind,
            body: render::render(kind, content, rows, sizing),
        }
    }
}
