use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resolver;

/// One piece of evidence behind an answer, search hit or logged query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitedDocument {
    pub file_path: String,
    /// Absent when query logs are fetched without content.
    #[serde(default)]
    pub content: Option<String>,
    pub score: f64,
    #[serde(default)]
    pub node_id: Option<String>,
}

impl CitedDocument {
    /// Replace a host-absolute upload path with its display form.
    pub fn normalize_path(&mut self) {
        self.file_path = resolver::normalize(&self.file_path);
    }

    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// `/top-similar-documents/` hit. Same fields as a citation.
pub type SimilarDocument = CitedDocument;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default, alias = "cited_documents")]
    pub citations: Vec<CitedDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryLog {
    pub id: i64,
    pub query: String,
    pub response: String,
    /// Seconds.
    pub latency: f64,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    /// ISO-8601; the backend omits the offset for UTC timestamps.
    pub timestamp: String,
    #[serde(default)]
    pub citations: Option<Vec<CitedDocument>>,
}

impl QueryLog {
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }

    pub fn citations(&self) -> &[CitedDocument] {
        self.citations.as_deref().unwrap_or(&[])
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryLogVolume {
    pub daily_count: u64,
    pub weekly_count: u64,
    pub monthly_count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmResponseMetrics {
    /// Seconds.
    pub avg_latency: f64,
    /// Percent, 0-100.
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopQueriedDocument {
    #[serde(alias = "document")]
    pub file_path: String,
    pub count: u64,
}

/// Body of `/query-logs/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryLogFilter {
    pub include_citations: bool,
    pub include_errors: bool,
}

impl Default for QueryLogFilter {
    fn default() -> Self {
        Self {
            include_citations: true,
            include_errors: true,
        }
    }
}

/// Look-back window for `/llm-response-metrics/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsPeriod {
    Day,
    Week,
    Month,
}

impl MetricsPeriod {
    pub const ALL: [MetricsPeriod; 3] = [MetricsPeriod::Day, MetricsPeriod::Week, MetricsPeriod::Month];

    pub fn days(self) -> i64 {
        match self {
            MetricsPeriod::Day => 1,
            MetricsPeriod::Week => 7,
            MetricsPeriod::Month => 30,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MetricsPeriod::Day => "Last 24 hours",
            MetricsPeriod::Week => "Last 7 days",
            MetricsPeriod::Month => "Last 30 days",
        }
    }

    pub fn start_date(self, today: NaiveDate) -> NaiveDate {
        today - Duration::days(self.days())
    }
}

/// A file queued for `/upload-docs/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}
