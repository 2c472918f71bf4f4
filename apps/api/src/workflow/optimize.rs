//! Optimization flow: send the resume and the chosen keywords to the backend
//! and accept only a successful, non-empty rewrite.

use serde::Deserialize;
use tracing::{info, warn};

use crate::backend::ResumeBackend;
use crate::errors::AppError;
use crate::models::keywords::ActionableKeyword;
use crate::models::optimization::{
    OptimizationRequest, OptimizationResult, SelectedKeyword, MIN_RESUME_TEXT_LEN,
};

#[derive(Debug, Clone, Deserialize)]
pub struct OptimizeInput {
    pub resume_text: String,
    pub job_description: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub selected_keywords: Vec<ActionableKeyword>,
}

/// Builds the backend request. Keyword category and priority already carry
/// their defaults (`Skill`, `medium`) from deserialization.
pub fn build_request(input: &OptimizeInput) -> Result<OptimizationRequest, AppError> {
    if input.resume_text.trim().chars().count() < MIN_RESUME_TEXT_LEN {
        return Err(AppError::Validation(
            "Resume text is missing or too short. Analyze your resume before optimizing."
                .to_string(),
        ));
    }
    if input.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Please paste the job description before optimizing.".to_string(),
        ));
    }
    let selected_keywords: Vec<SelectedKeyword> = input
        .selected_keywords
        .iter()
        .filter(|k| !k.keyword.trim().is_empty())
        .map(SelectedKeyword::from)
        .collect();
    if selected_keywords.is_empty() {
        return Err(AppError::Validation(
            "Select at least one keyword to add to your resume.".to_string(),
        ));
    }

    Ok(OptimizationRequest {
        original_resume_text: input.resume_text.clone(),
        selected_keywords,
        job_description: input.job_description.clone(),
        job_title: input.job_title.trim().to_string(),
        formatting_info: None,
    })
}

/// Rejects `success == false` with the backend's own message, and an empty
/// rewrite. The returned result always carries a formatting profile.
pub fn accept_result(mut result: OptimizationResult) -> Result<OptimizationResult, AppError> {
    if !result.success {
        let message = if result.message.trim().is_empty() {
            "Optimization failed".to_string()
        } else {
            result.message.clone()
        };
        warn!("Backend declined optimization: {message}");
        return Err(AppError::OptimizationRejected(message));
    }
    if result.optimized_resume.trim().is_empty() {
        return Err(AppError::OptimizationRejected(
            "No optimized resume returned from server".to_string(),
        ));
    }
    result.formatting = Some(result.formatting_or_default());
    Ok(result)
}

pub async fn optimize(
    backend: &dyn ResumeBackend,
    input: &OptimizeInput,
) -> Result<OptimizationResult, AppError> {
    let request = build_request(input)?;
    let keywords = request.selected_keywords.len();
    let result = accept_result(backend.optimize_resume(&request).await?)?;
    info!(
        keywords,
        changes = result.changes.len(),
        ats_score = result.ats_score,
        "Resume optimized"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendOperation;
    use crate::models::formatting::FormattingProfile;
    use crate::models::keywords::{KeywordCategory, Priority};
    use crate::workflow::testing::{FakeBackend, RESUME_TEXT};

    fn input(keywords: &str) -> OptimizeInput {
        let json = format!(
            r#"{{"resume_text": {resume:?}, "job_description": "Platform engineer",
                "selected_keywords": {keywords}}}"#,
            resume = RESUME_TEXT
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_keyword_defaults_applied() {
        let request = build_request(&input(r#"[{"keyword": "Kubernetes"}]"#)).unwrap();
        assert_eq!(request.selected_keywords[0].category, KeywordCategory::Skill);
        assert_eq!(request.selected_keywords[0].priority, Priority::Medium);
        assert!(request.formatting_info.is_none());
        assert_eq!(request.job_title, "");
    }

    #[test]
    fn test_no_keywords_selected() {
        assert!(matches!(build_request(&input("[]")), Err(AppError::Validation(_))));
        assert!(matches!(
            build_request(&input(r#"[{"keyword": "  "}]"#)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_short_resume_text_rejected() {
        let mut short = input(r#"[{"keyword": "Kubernetes"}]"#);
        short.resume_text = "Jane Doe".to_string();
        assert!(matches!(build_request(&short), Err(AppError::Validation(_))));

        short.resume_text = format!("  {}  ", "x".repeat(MIN_RESUME_TEXT_LEN - 1));
        assert!(matches!(build_request(&short), Err(AppError::Validation(_))));

        short.resume_text = "x".repeat(MIN_RESUME_TEXT_LEN);
        assert!(build_request(&short).is_ok());
    }

    #[tokio::test]
    async fn test_short_resume_never_reaches_backend() {
        let backend = FakeBackend::default();
        let mut short = input(r#"[{"keyword": "Kubernetes"}]"#);
        short.resume_text = "Jane Doe".to_string();
        assert!(optimize(&backend, &short).await.is_err());
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_unsuccessful_result_surfaces_message() {
        let result = OptimizationResult {
            success: false,
            message: "Resume text too short to optimize".to_string(),
            ..OptimizationResult::default()
        };
        match accept_result(result) {
            Err(AppError::OptimizationRejected(msg)) => {
                assert_eq!(msg, "Resume text too short to optimize")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_empty_rewrite_rejected() {
        let result = OptimizationResult {
            success: true,
            optimized_resume: "  ".to_string(),
            ..OptimizationResult::default()
        };
        assert!(matches!(
            accept_result(result),
            Err(AppError::OptimizationRejected(_))
        ));
    }

    #[tokio::test]
    async fn test_optimize_fills_default_formatting() {
        let backend = FakeBackend::default();
        let result = optimize(&backend, &input(r#"[{"keyword": "Kubernetes", "priority": "high"}]"#))
            .await
            .unwrap();
        assert_eq!(result.formatting, Some(FormattingProfile::default()));
        assert_eq!(backend.calls(), vec![BackendOperation::OptimizeResume]);
        let sent = backend.last_optimization.lock().unwrap().clone().unwrap();
        assert_eq!(sent.selected_keywords[0].priority, Priority::High);
    }

    #[tokio::test]
    async fn test_optimize_does_not_call_backend_on_invalid_input() {
        let backend = FakeBackend::default();
        assert!(optimize(&backend, &input("[]")).await.is_err());
        assert!(backend.calls().is_empty());
    }
}
