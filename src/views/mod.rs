pub mod chat;
pub mod dashboard;
pub mod format;
pub mod logs;
pub mod route;
pub mod search;
pub mod session;
pub mod upload;

use tokio::sync::Mutex;
use tracing::debug;

use crate::api::types::CitedDocument;
use crate::resolver::{classify, tabular, ContentKind, Preview, PreviewSizing, Selector, Transition};

pub use route::Route;
pub use session::{SessionKey, ViewRegistry, ViewSession};

/// A page that lists citations and lets one of them be expanded.
pub trait CitationSurface {
    fn citations(&self) -> &[CitedDocument];
    fn selector(&self) -> &Selector<usize>;
    fn selector_mut(&mut self) -> &mut Selector<usize>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    Shown(Preview),
    /// The citation was already open; toggled shut.
    Closed { path: String },
    /// The selection changed while the table was decoding.
    Superseded,
    Missing { available: usize },
    NoCitations(Route),
}

/// Toggle citation `number` (1-based) on the session's current page and
/// render it. Tabular content is decoded without holding the session lock;
/// the result is only used if the selection is still the same afterwards.
pub async fn open_citation(session: &Mutex<ViewSession>, number: usize, sizing: PreviewSizing) -> OpenOutcome {
    let (route, doc, ticket) = {
        let mut guard = session.lock().await;
        let route = guard.route;
        let Some(surface) = guard.surface_mut(route) else {
            return OpenOutcome::NoCitations(route);
        };

        let available = surface.citations().len();
        if number == 0 || number > available {
            return OpenOutcome::Missing { available };
        }
        let index = number - 1;
        let doc = surface.citations()[index].clone();

        if let Transition::Closed(_) = surface.selector_mut().select(index) {
            return OpenOutcome::Closed { path: doc.file_path };
        }
        if classify(&doc.file_path) != ContentKind::Tabular {
            return OpenOutcome::Shown(Preview::build(&doc.file_path, doc.content_or_empty(), &[], sizing));
        }
        let Some(ticket) = surface.selector().begin_decode() else {
            return OpenOutcome::Superseded;
        };
        (route, doc, ticket)
    };

    let rows = tabular::decode(doc.content_or_empty().to_string()).await;

    let mut guard = session.lock().await;
    let Some(surface) = guard.surface_mut(route) else {
        return OpenOutcome::Superseded;
    };
    if !surface.selector_mut().finish_decode(ticket, rows) {
        debug!(path = %doc.file_path, "selection moved on during decode");
        return OpenOutcome::Superseded;
    }
    OpenOutcome::Shown(Preview::build(
        &doc.file_path,
        doc.content_or_empty(),
        surface.selector().rows(),
        sizing,
    ))
}

/// Numbered citation list, marking the expanded entry.
pub fn render_citation_list(citations: &[CitedDocument], selected: Option<usize>, decimals: usize) -> String {
    let mut out = String::new();
    for (i, doc) in citations.iter().enumerate() {
        let marker = if selected == Some(i) { "▸" } else { "•" };
        out.push_str(&format!(
            "{} `{}` {} (score {:.*})\n",
            marker,
            i + 1,
            doc.file_path,
            decimals,
            doc.score
        ));
    }
    out
}
