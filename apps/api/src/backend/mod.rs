//! Client for the resume-analysis backend (text extraction, keyword analysis,
//! optimization).
//!
//! Each operation carries its own timeout. Nothing is retried: the AI-backed
//! endpoints are slow and costly, and a second call may word things
//! differently, so failures go straight back to the user.
//!
//! `AppState` holds an `Arc<dyn ResumeBackend>` so tests can swap in a fake.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::job::JobData;
use crate::models::keywords::KeywordAnalysisResult;
use crate::models::optimization::{ExtractionResult, OptimizationRequest, OptimizationResult};

// ────────────────────────────────────────────────────────────────────────────
// Operations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendOperation {
    ExtractText,
    AnalyzeKeywords,
    OptimizeResume,
}

impl BackendOperation {
    pub fn path(self) -> &'static str {
        match self {
            BackendOperation::ExtractText => "/api/extract-text",
            BackendOperation::AnalyzeKeywords => "/api/analyze-keywords",
            BackendOperation::OptimizeResume => "/api/optimize-resume",
        }
    }

    /// Large PDFs take a while to extract; AI rewriting is slower than analysis.
    pub fn timeout(self) -> Duration {
        match self {
            BackendOperation::ExtractText => Duration::from_secs(300),
            BackendOperation::AnalyzeKeywords => Duration::from_secs(30),
            BackendOperation::OptimizeResume => Duration::from_secs(120),
        }
    }

    /// What the user should do after this operation times out.
    pub fn timeout_message(self) -> &'static str {
        match self {
            BackendOperation::ExtractText => {
                "Analysis took too long. Please try with a smaller PDF file."
            }
            BackendOperation::AnalyzeKeywords => {
                "Keyword analysis took too long. Please try again."
            }
            BackendOperation::OptimizeResume => {
                "Optimization took too long. Please try again with fewer keywords."
            }
        }
    }
}

impl std::fmt::Display for BackendOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BackendOperation::ExtractText => "text extraction",
            BackendOperation::AnalyzeKeywords => "keyword analysis",
            BackendOperation::OptimizeResume => "resume optimization",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{}", .operation.timeout_message())]
    Timeout { operation: BackendOperation },

    /// Message taken from the backend's error body.
    #[error("{0}")]
    Service(String),

    #[error("Backend returned status {status}")]
    Status { status: u16 },

    #[error("Backend returned a malformed response: {0}")]
    Malformed(String),

    #[error("Could not reach the analysis backend: {0}")]
    Transport(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait ResumeBackend: Send + Sync {
    async fn extract_text(&self, filename: &str, pdf: Bytes) -> Result<ExtractionResult, BackendError>;

    async fn analyze_keywords(
        &self,
        resume_text: &str,
        job_data: &JobData,
    ) -> Result<KeywordAnalysisResult, BackendError>;

    /// Returns the backend's result as-is; callers decide what `success == false` means.
    async fn optimize_resume(
        &self,
        request: &OptimizationRequest,
    ) -> Result<OptimizationResult, BackendError>;
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP implementation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, operation: BackendOperation) -> String {
        format!("{}{}", self.base_url, operation.path())
    }
}

#[async_trait]
impl ResumeBackend for HttpBackend {
    async fn extract_text(&self, filename: &str, pdf: Bytes) -> Result<ExtractionResult, BackendError> {
        let operation = BackendOperation::ExtractText;
        let part = multipart::Part::bytes(pdf.to_vec())
            .file_name(filename.to_string())
            .mime_str("application/pdf")
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let form = multipart::Form::new().part("resume", part);

        info!(filename, bytes = pdf.len(), "Sending resume for text extraction");
        let response = self
            .client
            .post(self.url(operation))
            .multipart(form)
            .timeout(operation.timeout())
            .send()
            .await
            .map_err(|e| transport_error(operation, e))?;
        read_json(operation, response).await
    }

    async fn analyze_keywords(
        &self,
        resume_text: &str,
        job_data: &JobData,
    ) -> Result<KeywordAnalysisResult, BackendError> {
        let operation = BackendOperation::AnalyzeKeywords;
        info!(resume_len = resume_text.len(), "Requesting keyword analysis");
        let response = self
            .client
            .post(self.url(operation))
            .json(&json!({
                "resume_text": resume_text,
                "job_data": job_data,
            }))
            .timeout(operation.timeout())
            .send()
            .await
            .map_err(|e| transport_error(operation, e))?;
        read_json(operation, response).await
    }

    async fn optimize_resume(
        &self,
        request: &OptimizationRequest,
    ) -> Result<OptimizationResult, BackendError> {
        let operation = BackendOperation::OptimizeResume;
        info!(
            resume_len = request.original_resume_text.len(),
            keywords = request.selected_keywords.len(),
            "Requesting resume optimization"
        );
        let response = self
            .client
            .post(self.url(operation))
            .json(request)
            .timeout(operation.timeout())
            .send()
            .await
            .map_err(|e| transport_error(operation, e))?;
        read_json(operation, response).await
    }
}

fn transport_error(operation: BackendOperation, err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        warn!(%operation, "Backend call timed out");
        BackendError::Timeout { operation }
    } else {
        warn!(%operation, "Backend call failed: {err}");
        BackendError::Transport(err.to_string())
    }
}

async fn read_json<T: DeserializeOwned>(
    operation: BackendOperation,
    response: Response,
) -> Result<T, BackendError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(operation, e))?;

    if !status.is_success() {
        let err = error_from_body(status.as_u16(), &body);
        warn!(%operation, status = status.as_u16(), "Backend rejected request: {err}");
        return Err(err);
    }

    serde_json::from_str(&body).map_err(|e| BackendError::Malformed(e.to_string()))
}

/// Builds an error from a non-2xx body, preferring the backend's own message
/// (`error`, then `detail`, then `message`).
pub fn error_from_body(status: u16, body: &str) -> BackendError {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return BackendError::Status { status };
    };
    ["error", "detail", "message"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(|message| BackendError::Service(message.to_string()))
        .unwrap_or(BackendError::Status { status })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_body_prefers_error_field() {
        let err = error_from_body(400, r#"{"error": "File is not a PDF", "detail": "x"}"#);
        assert!(matches!(err, BackendError::Service(ref m) if m == "File is not a PDF"));
    }

    #[test]
    fn test_error_from_body_uses_detail_then_message() {
        let err = error_from_body(422, r#"{"detail": "resume_text is required"}"#);
        assert_eq!(err.to_string(), "resume_text is required");
        let err = error_from_body(500, r#"{"message": "Model overloaded"}"#);
        assert_eq!(err.to_string(), "Model overloaded");
    }

    #[test]
    fn test_error_from_body_falls_back_to_status() {
        assert!(matches!(
            error_from_body(502, "<html>Bad Gateway</html>"),
            BackendError::Status { status: 502 }
        ));
        // FastAPI validation errors put a list in `detail`.
        assert!(matches!(
            error_from_body(422, r#"{"detail": [{"loc": ["body"], "msg": "field required"}]}"#),
            BackendError::Status { status: 422 }
        ));
    }

    #[test]
    fn test_operation_timeouts() {
        assert_eq!(BackendOperation::ExtractText.timeout(), Duration::from_secs(300));
        assert_eq!(BackendOperation::AnalyzeKeywords.timeout(), Duration::from_secs(30));
        assert_eq!(BackendOperation::OptimizeResume.timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_timeout_error_message_is_actionable() {
        let err = BackendError::Timeout {
            operation: BackendOperation::OptimizeResume,
        };
        assert!(err.to_string().contains("fewer keywords"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let backend = HttpBackend::new("http://localhost:8000/").unwrap();
        assert_eq!(
            backend.url(BackendOperation::AnalyzeKeywords),
            "http://localhost:8000/api/analyze-keywords"
        );
    }
}
