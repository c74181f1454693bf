use tokio::sync::Mutex;
use tracing::info;

use crate::api::fallback::{self, Notice};
use crate::api::types::SimilarDocument;
use crate::api::KnowledgeBase;
use crate::resolver::Selector;

use super::format::format_match;
use super::route::{render_nav, Route};
use super::session::ViewSession;
use super::CitationSurface;

pub const MIN_LIMIT: usize = 1;
pub const MAX_LIMIT: usize = 20;

#[derive(Debug, Default)]
pub struct SearchView {
    query: String,
    results: Vec<SimilarDocument>,
    selector: Selector<usize>,
}

impl SearchView {
    /// Install a fresh result set; paths are normalized and any expanded
    /// document is collapsed.
    pub fn replace_results(&mut self, query: String, mut results: Vec<SimilarDocument>) {
        for doc in &mut results {
            doc.normalize_path();
        }
        self.query = query;
        self.results = results;
        self.selector.reset();
    }

    pub fn render(&self) -> String {
        let mut out = format!("{}\n\n", render_nav(Route::Search));
        if self.results.is_empty() {
            out.push_str("**No Documents Found**\nTry searching for something else or adjust your search query.");
            return out;
        }

        out.push_str(&format!(
            "**Search Results** for \"{}\" ({}):\n",
            self.query,
            self.results.len()
        ));
        let selected = self.selector.selected().copied();
        for (i, doc) in self.results.iter().enumerate() {
            let marker = if selected == Some(i) { "▸" } else { "•" };
            out.push_str(&format!(
                "{} `{}` {} — {} match\n",
                marker,
                i + 1,
                doc.file_path,
                format_match(doc.score)
            ));
        }
        out.push_str("\nUse `/kb open <n>` to preview a document.");
        out
    }
}

impl CitationSurface for SearchView {
    fn citations(&self) -> &[SimilarDocument] {
        &self.results
    }

    fn selector(&self) -> &Selector<usize> {
        &self.selector
    }

    fn selector_mut(&mut self) -> &mut Selector<usize> {
        &mut self.selector
    }
}

pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(MIN_LIMIT, MAX_LIMIT)
}

#[derive(Debug)]
pub enum SearchOutcome {
    /// Blank query; nothing was sent.
    Ignored,
    Completed { hits: usize, notices: Vec<Notice> },
}

/// Run a similarity search and install the results in the session.
/// A failed request shows an empty result list plus a notice.
pub async fn search(
    session: &Mutex<ViewSession>,
    api: &dyn KnowledgeBase,
    query: &str,
    limit: usize,
) -> SearchOutcome {
    session.lock().await.navigate(Route::Search);
    let query = query.trim();
    if query.is_empty() {
        return SearchOutcome::Ignored;
    }

    let k = clamp_limit(limit);
    let mut notices = Vec::new();
    let results = fallback::or_default(
        api.top_similar_documents(query, k).await,
        "Failed to fetch similar documents",
        &mut notices,
    );
    let hits = results.len();
    info!(query, k, hits, "document search");

    session
        .lock()
        .await
        .search
        .replace_results(query.to_string(), results);
    SearchOutcome::Completed { hits, notices }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::api::stub::{doc, StubKnowledgeBase};

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(5), 5);
        assert_eq!(clamp_limit(99), 20);
    }

    #[tokio::test]
    async fn test_search_normalizes_and_resets_selection() {
        let api = StubKnowledgeBase {
            similar: vec![doc(r"C:\x\tmp\faq.md", "# FAQ", 0.91), doc("b.csv", "a\n1", 0.5)],
            ..Default::default()
        };
        let session = Mutex::new(ViewSession::default());
        session.lock().await.search.selector_mut().select(0);

        let outcome = search(&session, &api, "  install driver ", 99).await;
        assert!(matches!(outcome, SearchOutcome::Completed { hits: 2, ref notices } if notices.is_empty()));
        assert_eq!(api.last_k.load(Ordering::SeqCst), MAX_LIMIT);

        let guard = session.lock().await;
        assert_eq!(guard.route, Route::Search);
        assert_eq!(guard.search.query, "install driver");
        assert_eq!(guard.search.results[0].file_path, "faq.md");
        assert!(guard.search.selector().selected().is_none());
        assert!(guard.search.render().contains("`1` faq.md — 91.0% match"));
    }

    #[tokio::test]
    async fn test_blank_query_sends_nothing() {
        let api = StubKnowledgeBase::default();
        let session = Mutex::new(ViewSession::default());
        assert!(matches!(search(&session, &api, "   ", 5).await, SearchOutcome::Ignored));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_search_shows_empty_with_notice() {
        let api = StubKnowledgeBase::failing();
        let session = Mutex::new(ViewSession::default());
        match search(&session, &api, "anything", 5).await {
            SearchOutcome::Completed { hits, notices } => {
                assert_eq!(hits, 0);
                assert_eq!(notices, vec![Notice::error("Failed to fetch similar documents")]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(session.lock().await.search.render().contains("No Documents Found"));
    }
}
