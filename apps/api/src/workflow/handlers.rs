//! Axum route handlers for the analysis and optimization workflow.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::job::JobData;
use crate::models::keywords::KeywordAnalysisResult;
use crate::models::optimization::OptimizationResult;
use crate::state::AppState;
use crate::workflow::analyze::{self, AnalysisOutcome, ExtractedResume};
use crate::workflow::optimize::{self, OptimizeInput};
use crate::workflow::ResumeUpload;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StructureJobRequest {
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeKeywordsRequest {
    pub resume_text: String,
    #[serde(default)]
    pub job_data: JobData,
}

/// Fields of the analysis form: a `resume` file and `job_description` text.
#[derive(Debug, Default)]
struct AnalysisForm {
    resume: Option<ResumeUpload>,
    job_description: String,
}

async fn read_form(mut multipart: Multipart) -> Result<AnalysisForm, AppError> {
    let mut form = AnalysisForm::default();
    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let filename = field.file_name().unwrap_or("resume.pdf").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(invalid_form)?;
                form.resume = Some(ResumeUpload {
                    filename,
                    content_type,
                    bytes,
                });
            }
            Some("job_description") => {
                form.job_description = field.text().await.map_err(invalid_form)?;
            }
            _ => {}
        }
    }
    Ok(form)
}

/// A body cut off by the route's size limit is reported as an oversized file.
fn invalid_form(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return analyze::file_too_large();
    }
    AppError::Validation(format!("Could not read the uploaded form: {e}"))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/extract
/// Multipart body with a `resume` PDF.
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractedResume>, AppError> {
    let form = read_form(multipart).await?;
    let extracted = analyze::extract_resume(state.backend.as_ref(), form.resume.as_ref()).await?;
    Ok(Json(extracted))
}

/// POST /api/v1/job/structure
pub async fn handle_structure_job(
    State(state): State<AppState>,
    Json(req): Json<StructureJobRequest>,
) -> Result<Json<JobData>, AppError> {
    let job_data = analyze::structure_job(&state.llm, &req.job_description).await?;
    Ok(Json(job_data))
}

/// POST /api/v1/analyze
/// Multipart body with a `resume` PDF and the pasted `job_description`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisOutcome>, AppError> {
    let form = read_form(multipart).await?;
    let outcome = analyze::run_analysis(
        state.backend.as_ref(),
        &state.llm,
        form.resume.as_ref(),
        &form.job_description,
    )
    .await?;
    Ok(Json(outcome))
}

/// POST /api/v1/keywords/analyze
pub async fn handle_analyze_keywords(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeKeywordsRequest>,
) -> Result<Json<KeywordAnalysisResult>, AppError> {
    let analysis =
        analyze::analyze_keywords(state.backend.as_ref(), &req.resume_text, &req.job_data).await?;
    Ok(Json(analysis))
}

/// POST /api/v1/resume/optimize
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(input): Json<OptimizeInput>,
) -> Result<Json<OptimizationResult>, AppError> {
    let result = optimize::optimize(state.backend.as_ref(), &input).await?;
    Ok(Json(result))
}
