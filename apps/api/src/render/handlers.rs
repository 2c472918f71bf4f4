//! Axum handler for the render/download endpoint.

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::formatting::FormattingProfile;
use crate::models::job::JobData;
use crate::render::{download_filename, render_pdf, render_text, OutputFormat};

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub optimized_resume: String,
    #[serde(default)]
    pub formatting: Option<FormattingProfile>,
    #[serde(default)]
    pub company: Option<String>,
    /// Structured job from the analysis step; its company names the file
    /// when `company` is not given.
    #[serde(default)]
    pub job_data: Option<JobData>,
    #[serde(default)]
    pub format: OutputFormat,
}

impl RenderRequest {
    fn company_name(&self) -> Option<&str> {
        self.company
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .or_else(|| self.job_data.as_ref().and_then(JobData::company_name))
    }
}

/// POST /api/v1/resume/render
/// Returns the document bytes with a `Content-Disposition` filename.
pub async fn handle_render(Json(req): Json<RenderRequest>) -> Result<Response, AppError> {
    if req.optimized_resume.trim().is_empty() {
        return Err(AppError::Validation(
            "There is no optimized resume to download yet. Run the optimization first.".to_string(),
        ));
    }

    let filename = download_filename(
        &req.optimized_resume,
        req.company_name(),
        Utc::now().date_naive(),
        req.format,
    );

    let body = match req.format {
        OutputFormat::Pdf => {
            let profile = req.formatting.unwrap_or_default();
            let text = req.optimized_resume;
            // CPU-bound layout; keep it off the async executor.
            tokio::task::spawn_blocking(move || render_pdf(&text, &profile))
                .await
                .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))??
        }
        OutputFormat::Text => render_text(&req.optimized_resume).into_bytes(),
    };

    info!(filename = %filename, bytes = body.len(), "Resume rendered for download");

    let headers = [
        (header::CONTENT_TYPE, req.format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, body).into_response())
}
