pub mod client;
pub mod error;
pub mod fallback;
pub mod types;

#[cfg(test)]
pub mod stub;

use async_trait::async_trait;
use chrono::NaiveDate;

pub use client::ApiClient;
pub use error::ApiResult;
pub use fallback::Notice;
use types::*;

/// The remote knowledge-base service. Retrieval, ranking, inference and
/// metric aggregation all happen behind this boundary.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    async fn query_log_volume(&self) -> ApiResult<QueryLogVolume>;

    async fn llm_response_metrics(&self, start_date: NaiveDate) -> ApiResult<LlmResponseMetrics>;

    async fn top_queried_documents(&self, k: usize) -> ApiResult<Vec<TopQueriedDocument>>;

    async fn query_logs(&self, filter: QueryLogFilter) -> ApiResult<Vec<QueryLog>>;

    async fn query(&self, query: &str) -> ApiResult<ChatResponse>;

    /// Multipart upload, one `files` part per document.
    async fn upload_documents(&self, files: Vec<UploadFile>) -> ApiResult<()>;

    async fn top_similar_documents(&self, query: &str, k: usize) -> ApiResult<Vec<SimilarDocument>>;
}
