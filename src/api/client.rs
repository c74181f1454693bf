use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use super::error::{ApiError, ApiResult};
use super::types::*;
use super::KnowledgeBase;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const QUERY_LOG_VOLUME: &str = "/query-log-volume/";
const LLM_RESPONSE_METRICS: &str = "/llm-response-metrics/";
const TOP_QUERIED_DOCUMENTS: &str = "/top-queried-documents/";
const QUERY_LOGS: &str = "/query-logs/";
const QUERY: &str = "/query/";
const UPLOAD_DOCS: &str = "/upload-docs/";
const TOP_SIMILAR_DOCUMENTS: &str = "/top-similar-documents/";

/// HTTP client for the knowledge-base service.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn post_json<B, T>(&self, endpoint: &'static str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.client.post(self.url(endpoint)).json(body);
        self.send(endpoint, req).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        req: reqwest::RequestBuilder,
    ) -> ApiResult<T> {
        let started = std::time::Instant::now();
        let resp = req
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::status(endpoint, status));
        }

        let text = resp
            .text()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;
        debug!(
            endpoint,
            status = status.as_u16(),
            bytes = text.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "API response"
        );
        serde_json::from_str(&text).map_err(|source| ApiError::Decode { endpoint, source })
    }
}

#[async_trait]
impl KnowledgeBase for ApiClient {
    async fn query_log_volume(&self) -> ApiResult<QueryLogVolume> {
        let req = self.client.get(self.url(QUERY_LOG_VOLUME));
        self.send(QUERY_LOG_VOLUME, req).await
    }

    async fn llm_response_metrics(&self, start_date: chrono::NaiveDate) -> ApiResult<LlmResponseMetrics> {
        let body = serde_json::json!({ "start_date": start_date.format("%Y-%m-%d").to_string() });
        self.post_json(LLM_RESPONSE_METRICS, &body).await
    }

    async fn top_queried_documents(&self, k: usize) -> ApiResult<Vec<TopQueriedDocument>> {
        self.post_json(TOP_QUERIED_DOCUMENTS, &serde_json::json!({ "k": k }))
            .await
    }

    async fn query_logs(&self, filter: QueryLogFilter) -> ApiResult<Vec<QueryLog>> {
        self.post_json(QUERY_LOGS, &filter).await
    }

    async fn query(&self, query: &str) -> ApiResult<ChatResponse> {
        info!(query_len = query.len(), "sending query to knowledge base");
        self.post_json(QUERY, &serde_json::json!({ "query": query }))
            .await
    }

    async fn upload_documents(&self, files: Vec<UploadFile>) -> ApiResult<()> {
        let count = files.len();
        let mut form = Form::new();
        for file in files {
            form = form.part("files", Part::bytes(file.bytes).file_name(file.name));
        }

        let resp = self
            .client
            .post(self.url(UPLOAD_DOCS))
            .multipart(form)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: UPLOAD_DOCS,
                source,
            })?;

        if !resp.status().is_success() {
            return Err(ApiError::status(UPLOAD_DOCS, resp.status()));
        }
        info!(count, "documents uploaded");
        Ok(())
    }

    async fn top_similar_documents(&self, query: &str, k: usize) -> ApiResult<Vec<SimilarDocument>> {
        self.post_json(
            TOP_SIMILAR_DOCUMENTS,
            &serde_json::json!({ "query": query, "k": k }),
        )
        .await
    }
}
