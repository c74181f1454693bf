use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::api::fallback::{self, Notice};
use crate::api::types::{LlmResponseMetrics, MetricsPeriod, QueryLogVolume, TopQueriedDocument};
use crate::api::KnowledgeBase;

use super::format::{format_latency, short_name};
use super::route::{render_nav, Route};

/// Snapshot of the dashboard cards. Failed fetches show zeroes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub volume: QueryLogVolume,
    pub metrics: Vec<(MetricsPeriod, LlmResponseMetrics)>,
    pub top_documents: Vec<TopQueriedDocument>,
}

impl DashboardView {
    /// Fetch every card concurrently.
    pub async fn load(api: &dyn KnowledgeBase, top_k: usize, today: NaiveDate) -> (Self, Vec<Notice>) {
        let (volume, day, week, month, top) = futures::join!(
            api.query_log_volume(),
            api.llm_response_metrics(MetricsPeriod::Day.start_date(today)),
            api.llm_response_metrics(MetricsPeriod::Week.start_date(today)),
            api.llm_response_metrics(MetricsPeriod::Month.start_date(today)),
            api.top_queried_documents(top_k),
        );

        let mut notices = Vec::new();
        let volume = fallback::or_default(volume, "Failed to fetch query volume data", &mut notices);
        let mut metrics = Vec::with_capacity(3);
        for (period, result) in MetricsPeriod::ALL.into_iter().zip([day, week, month]) {
            metrics.push((
                period,
                fallback::or_default(result, "Failed to fetch LLM metrics data", &mut notices),
            ));
        }
        // Three metric failures are one problem to the user.
        notices.dedup();
        let mut top_documents =
            fallback::or_default(top, "Failed to fetch top queried documents", &mut notices);
        top_documents.sort_by(|a, b| b.count.cmp(&a.count));

        info!(
            daily = volume.daily_count,
            top_documents = top_documents.len(),
            failures = notices.len(),
            "dashboard loaded"
        );
        (
            Self {
                volume,
                metrics,
                top_documents,
            },
            notices,
        )
    }

    pub async fn load_now(api: &dyn KnowledgeBase, top_k: usize) -> (Self, Vec<Notice>) {
        Self::load(api, top_k, Utc::now().date_naive()).await
    }

    /// `only` limits the metric cards to one period.
    pub fn render(&self, only: Option<MetricsPeriod>) -> String {
        let mut out = format!("{}\n\n", render_nav(Route::Dashboard));

        out.push_str("**Query Volume**\n");
        out.push_str(&format!(
            "Today: {} · This week: {} · This month: {}\n\n",
            self.volume.daily_count, self.volume.weekly_count, self.volume.monthly_count
        ));

        for (period, m) in &self.metrics {
            if only.is_some_and(|p| p != *period) {
                continue;
            }
            out.push_str(&format!(
                "**{}** — avg response time {} · success rate {:.1}%\n",
                period.label(),
                format_latency(m.avg_latency),
                m.success_rate
            ));
        }

        out.push_str("\n**Top Queried Documents**\n");
        if self.top_documents.is_empty() {
            out.push_str("No document citations recorded yet.\n");
        }
        for (i, doc) in self.top_documents.iter().enumerate() {
            out.push_str(&format!(
                "`{}` {} — {} queries\n",
                i + 1,
                short_name(&doc.file_path),
                doc.count
            ));
        }
        out
    }
}
