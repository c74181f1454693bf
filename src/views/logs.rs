use std::cmp::Ordering;

use tokio::sync::Mutex;
use tracing::info;

use crate::api::fallback::{self, Notice};
use crate::api::types::{CitedDocument, QueryLog, QueryLogFilter};
use crate::api::KnowledgeBase;
use crate::resolver::Selector;

use super::format::{format_latency, format_timestamp, one_line, truncate_text};
use super::render_citation_list;
use super::route::{render_nav, Route};
use super::session::ViewSession;
use super::CitationSurface;

const TRUNCATE_AT: usize = 100;

/// Query-log table plus the citation inspector for one selected row.
#[derive(Debug, Default)]
pub struct QueryLogView {
    logs: Vec<QueryLog>,
    inspected: Option<usize>,
    selector: Selector<usize>,
}

impl QueryLogView {
    pub fn logs(&self) -> &[QueryLog] {
        &self.logs
    }

    pub fn inspected(&self) -> Option<&QueryLog> {
        self.inspected.and_then(|i| self.logs.get(i))
    }

    /// Newest first; citation paths normalized. Closes the inspector.
    pub fn replace_logs(&mut self, mut logs: Vec<QueryLog>) {
        sort_newest_first(&mut logs);
        for log in &mut logs {
            if let Some(citations) = log.citations.as_mut() {
                for doc in citations {
                    doc.normalize_path();
                }
            }
        }
        self.logs = logs;
        self.inspected = None;
        self.selector.reset();
    }

    /// Open the citation inspector for table row `row` (1-based).
    pub fn inspect(&mut self, row: usize) -> Option<&QueryLog> {
        let index = row.checked_sub(1).filter(|i| *i < self.logs.len())?;
        self.inspected = Some(index);
        self.selector.reset();
        self.logs.get(index)
    }

    pub fn close_inspector(&mut self) {
        self.inspected = None;
        self.selector.reset();
    }

    pub fn render_table(&self, limit: usize) -> String {
        let mut out = format!("{}\n\n", render_nav(Route::QueryLogs));
        if self.logs.is_empty() {
            out.push_str("No query logs available");
            return out;
        }

        for (i, log) in self.logs.iter().take(limit).enumerate() {
            let status = if log.success { "✅" } else { "❌" };
            out.push_str(&format!(
                "`{}` {} **{}** · {} · {}\n> {}\n",
                i + 1,
                status,
                truncate_text(&one_line(&log.query), TRUNCATE_AT),
                format_latency(log.latency),
                format_timestamp(&log.timestamp),
                truncate_text(&one_line(&log.response), TRUNCATE_AT),
            ));
            if let Some(error) = &log.error {
                out.push_str(&format!("> error: {}\n", truncate_text(&one_line(error), TRUNCATE_AT)));
            }
            let cited = log.citations().len();
            if cited > 0 {
                out.push_str(&format!("> {} cited document(s)\n", cited));
            }
        }
        if self.logs.len() > limit {
            out.push_str(&format!("\n… {} older entries\n", self.logs.len() - limit));
        }
        out.push_str("\nUse `/kb inspect <row>` to view cited documents.");
        out
    }

    pub fn render_inspector(&self) -> String {
        let Some(log) = self.inspected() else {
            return "No query selected.".to_string();
        };
        let mut out = format!(
            "{}\n\n**Cited Documents for Query**\n**Query:** {}\n\n",
            render_nav(Route::QueryLogs),
            log.query
        );
        if log.citations().is_empty() {
            out.push_str("No documents cited for this query");
        } else {
            out.push_str(&render_citation_list(
                log.citations(),
                self.selector.selected().copied(),
                3,
            ));
            out.push_str("Use `/kb open <n>` to view a document.");
        }
        out
    }
}

impl CitationSurface for QueryLogView {
    fn citations(&self) -> &[CitedDocument] {
        self.inspected().map(QueryLog::citations).unwrap_or(&[])
    }

    fn selector(&self) -> &Selector<usize> {
        &self.selector
    }

    fn selector_mut(&mut self) -> &mut Selector<usize> {
        &mut self.selector
    }
}

/// Descending by timestamp; entries whose timestamp doesn't parse go last.
pub fn sort_newest_first(logs: &mut [QueryLog]) {
    logs.sort_by(|a, b| match (a.parsed_timestamp(), b.parsed_timestamp()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Fetch the logs and install them in the session. Failure leaves an
/// empty table and a notice.
pub async fn load(session: &Mutex<ViewSession>, api: &dyn KnowledgeBase, filter: QueryLogFilter) -> Vec<Notice> {
    session.lock().await.navigate(Route::QueryLogs);
    let mut notices = Vec::new();
    let logs = fallback::or_default(api.query_logs(filter).await, "Failed to fetch query logs", &mut notices);
    info!(count = logs.len(), "query logs loaded");
    session.lock().await.logs.replace_logs(logs);
    notices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::{doc, log, StubKnowledgeBase};

    fn sample_logs() -> Vec<QueryLog> {
        vec![
            log(1, "2024-05-01T08:00:00", vec![]),
            log(2, "garbage", vec![]),
            log(3, "2024-05-03T08:00:00Z", vec![doc(r"C:\a\tmp\x.csv", "c\n1", 0.4321)]),
            log(4, "2024-05-02T08:00:00.250", vec![]),
        ]
    }

    #[test]
    fn test_sort_newest_first_unparseable_last() {
        let mut logs = sample_logs();
        sort_newest_first(&mut logs);
        let ids: Vec<i64> = logs.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3, 4, 1, 2]);
    }

    #[tokio::test]
    async fn test_load_sorts_and_normalizes() {
        let api = StubKnowledgeBase {
            logs: sample_logs(),
            ..Default::default()
        };
        let session = Mutex::new(ViewSession::default());
        let notices = load(&session, &api, QueryLogFilter::default()).await;
        assert!(notices.is_empty());

        let guard = session.lock().await;
        assert_eq!(guard.route, Route::QueryLogs);
        assert_eq!(guard.logs.logs()[0].id, 3);
        assert_eq!(guard.logs.logs()[0].citations()[0].file_path, "x.csv");
    }

    #[tokio::test]
    async fn test_load_failure_notice() {
        let api = StubKnowledgeBase::failing();
        let session = Mutex::new(ViewSession::default());
        let notices = load(&session, &api, QueryLogFilter::default()).await;
        assert_eq!(notices, vec![Notice::error("Failed to fetch query logs")]);
        assert!(session.lock().await.logs.render_table(10).contains("No query logs available"));
    }

    #[test]
    fn test_inspect_resets_citation_selection() {
        let mut view = QueryLogView::default();
        view.replace_logs(sample_logs());
        assert!(view.inspect(0).is_none());
        assert!(view.inspect(9).is_none());

        assert_eq!(view.inspect(1).map(|l| l.id), Some(3));
        view.selector_mut().select(0);
        assert_eq!(view.citations().len(), 1);

        view.inspect(2);
        assert!(view.selector().selected().is_none());
        assert!(view.citations().is_empty());
        assert!(view.render_inspector().contains("No documents cited for this query"));
    }

    #[test]
    fn test_render_table_formats() {
        let mut logs = sample_logs();
        logs[2].query = "q".repeat(150);
        logs[2].latency = 1.5;
        let mut view = QueryLogView::default();
        view.replace_logs(logs);
        let table = view.render_table(2);
        assert!(table.contains(&format!("{}...", "q".repeat(100))));
        assert!(table.contains("1.50 s"));
        assert!(table.contains("250 ms"));
        assert!(table.contains("May 03, 2024 08:00:00"));
        assert!(table.contains("… 2 older entries"));

        view.inspect(1);
        assert!(view.render_inspector().contains("`1` x.csv (score 0.432)"));
    }
}
