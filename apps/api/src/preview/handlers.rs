//! Axum handler for the preview endpoint.

use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::optimization::ResumeChange;
use crate::preview::{added_keyword_set, highlight, ChangesSummary, PreviewLine, ScoreSummary};

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub original_resume: String,
    pub optimized_resume: String,
    #[serde(default)]
    pub changes: Vec<ResumeChange>,
    pub ats_score: f64,
    #[serde(default)]
    pub original_score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub lines: Vec<PreviewLine>,
    pub changes: ChangesSummary,
    pub score: ScoreSummary,
}

/// POST /api/v1/resume/preview
pub async fn handle_preview(Json(req): Json<PreviewRequest>) -> Result<Json<PreviewResponse>, AppError> {
    if req.optimized_resume.trim().is_empty() {
        return Err(AppError::Validation(
            "There is no optimized resume to preview yet. Run the optimization first.".to_string(),
        ));
    }

    let keywords = added_keyword_set(&req.changes);
    let lines = highlight(&req.original_resume, &req.optimized_resume, &keywords);
    let highlighted = lines
        .iter()
        .filter_map(|line| match line {
            PreviewLine::Tokens { tokens } => Some(tokens.iter().filter(|t| t.highlighted).count()),
            _ => None,
        })
        .sum::<usize>();
    info!(lines = lines.len(), highlighted, "Preview computed");

    Ok(Json(PreviewResponse {
        lines,
        changes: ChangesSummary::from_changes(&req.changes),
        score: ScoreSummary::new(req.ats_score, req.original_score),
    }))
}
