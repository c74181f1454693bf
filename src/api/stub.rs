//! In-memory `KnowledgeBase` for view tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::{ApiError, ApiResult};
use super::types::*;
use super::KnowledgeBase;

#[derive(Default)]
pub struct StubKnowledgeBase {
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
    pub volume: QueryLogVolume,
    pub metrics: LlmResponseMetrics,
    pub top_documents: Vec<TopQueriedDocument>,
    pub logs: Vec<QueryLog>,
    pub answer: Option<ChatResponse>,
    pub similar: Vec<SimilarDocument>,
    pub uploaded: Mutex<Vec<String>>,
    pub last_k: AtomicUsize,
}

impl StubKnowledgeBase {
    pub fn failing() -> Self {
        let stub = Self::default();
        stub.fail.store(true, Ordering::SeqCst);
        stub
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self, endpoint: &'static str) -> ApiResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            Err(ApiError::Status {
                endpoint,
                status: 500,
                reason: "Internal Server Error".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

pub fn doc(path: &str, content: &str, score: f64) -> CitedDocument {
    CitedDocument {
        file_path: path.to_string(),
        content: Some(content.to_string()),
        score,
        node_id: None,
    }
}

pub fn log(id: i64, timestamp: &str, citations: Vec<CitedDocument>) -> QueryLog {
    QueryLog {
        id,
        query: format!("query {id}"),
        response: format!("response {id}"),
        latency: 0.25,
        success: true,
        error: None,
        timestamp: timestamp.to_string(),
        citations: Some(citations),
    }
}

#[async_trait]
impl KnowledgeBase for StubKnowledgeBase {
    async fn query_log_volume(&self) -> ApiResult<QueryLogVolume> {
        self.enter("/query-log-volume/")?;
        Ok(self.volume)
    }

    async fn llm_response_metrics(&self, _start_date: NaiveDate) -> ApiResult<LlmResponseMetrics> {
        self.enter("/llm-response-metrics/")?;
        Ok(self.metrics)
    }

    async fn top_queried_documents(&self, k: usize) -> ApiResult<Vec<TopQueriedDocument>> {
        self.enter("/top-queried-documents/")?;
        self.last_k.store(k, Ordering::SeqCst);
        Ok(self.top_documents.clone())
    }

    async fn query_logs(&self, _filter: QueryLogFilter) -> ApiResult<Vec<QueryLog>> {
        self.enter("/query-logs/")?;
        Ok(self.logs.clone())
    }

    async fn query(&self, query: &str) -> ApiResult<ChatResponse> {
        self.enter("/query/")?;
        Ok(self.answer.clone().unwrap_or_else(|| ChatResponse {
            response: format!("echo: {query}"),
            citations: Vec::new(),
        }))
    }

    async fn upload_documents(&self, files: Vec<UploadFile>) -> ApiResult<()> {
        self.enter("/upload-docs/")?;
        let mut uploaded = self.uploaded.lock().unwrap();
        uploaded.extend(files.into_iter().map(|f| f.name));
        Ok(())
    }

    async fn top_similar_documents(&self, _query: &str, k: usize) -> ApiResult<Vec<SimilarDocument>> {
        self.enter("/top-similar-documents/")?;
        self.last_k.store(k, Ordering::SeqCst);
        Ok(self.similar.iter().take(k).cloned().collect())
    }
}
