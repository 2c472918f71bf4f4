//! Analysis flow: structure the job description, extract resume text,
//! run keyword gap analysis.

use serde::Serialize;
use tracing::{info, warn};

use super::prompts::{build_jd_structure_prompt, JD_STRUCTURE_SYSTEM};
use super::ResumeUpload;
use crate::backend::ResumeBackend;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::job::JobData;
use crate::models::keywords::KeywordAnalysisResult;
use crate::models::optimization::MIN_RESUME_TEXT_LEN;

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Largest resume file accepted for extraction.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Request body limit for the upload routes: the file plus room for the
/// other form fields and multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

#[derive(Debug, Clone, Serialize)]
pub struct ExtractedResume {
    pub resume_text: String,
    pub filename: String,
    pub length: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub job_data: JobData,
    pub resume_text: String,
    pub analysis: KeywordAnalysisResult,
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

pub fn validate_job_description(job_description: &str) -> Result<&str, AppError> {
    let trimmed = job_description.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "Please paste the job description before analyzing.".to_string(),
        ));
    }
    Ok(trimmed)
}

/// Accepts a PDF by content type or by `.pdf` extension, up to
/// [`MAX_UPLOAD_BYTES`].
pub fn validate_resume_upload(upload: Option<&ResumeUpload>) -> Result<&ResumeUpload, AppError> {
    let Some(upload) = upload.filter(|u| !u.bytes.is_empty()) else {
        return Err(AppError::Validation(
            "Please upload your resume as a PDF file.".to_string(),
        ));
    };
    let is_pdf_type = upload
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.eq_ignore_ascii_case(PDF_CONTENT_TYPE));
    let is_pdf_name = upload.filename.to_ascii_lowercase().ends_with(".pdf");
    if !is_pdf_type && !is_pdf_name {
        return Err(AppError::UnsupportedFileType(format!(
            "'{}' is not a PDF. Please upload your resume as a .pdf file.",
            upload.filename
        )));
    }
    if upload.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(file_too_large());
    }
    Ok(upload)
}

pub fn file_too_large() -> AppError {
    AppError::FileTooLarge(format!(
        "The resume file is larger than {} MB. Please upload a smaller PDF.",
        MAX_UPLOAD_BYTES / (1024 * 1024)
    ))
}

/// Extracted text must be at least [`MIN_RESUME_TEXT_LEN`] characters.
pub fn require_resume_text(text: Option<&str>) -> Result<String, AppError> {
    let text = text.map(str::trim).unwrap_or_default();
    if text.chars().count() < MIN_RESUME_TEXT_LEN {
        return Err(AppError::ExtractionFailed(
            "Could not extract enough text from the PDF. Make sure it is a text-based PDF, \
             not a scanned image."
                .to_string(),
        ));
    }
    Ok(text.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Steps
// ────────────────────────────────────────────────────────────────────────────

/// Turns pasted job-description text into `JobData` via the LLM.
pub async fn structure_job(llm: &LlmClient, job_description: &str) -> Result<JobData, AppError> {
    let job_description = validate_job_description(job_description)?;
    let prompt = build_jd_structure_prompt(job_description);
    let job_data: JobData = llm
        .call_json(&prompt, JD_STRUCTURE_SYSTEM)
        .await
        .inspect_err(|e| warn!("Job description structuring failed: {e}"))?;
    info!(
        title = %job_data.title,
        skills = job_data.skills.len(),
        "Job description structured"
    );
    Ok(job_data)
}

pub async fn extract_resume(
    backend: &dyn ResumeBackend,
    upload: Option<&ResumeUpload>,
) -> Result<ExtractedResume, AppError> {
    let upload = validate_resume_upload(upload)?;
    let result = backend
        .extract_text(&upload.filename, upload.bytes.clone())
        .await?;
    let resume_text = require_resume_text(result.resume_text())?;
    info!(
        filename = %upload.filename,
        length = resume_text.len(),
        "Resume text extracted"
    );
    Ok(ExtractedResume {
        length: resume_text.chars().count(),
        filename: result.filename.unwrap_or_else(|| upload.filename.clone()),
        resume_text,
    })
}

pub async fn analyze_keywords(
    backend: &dyn ResumeBackend,
    resume_text: &str,
    job_data: &JobData,
) -> Result<KeywordAnalysisResult, AppError> {
    let resume_text = require_resume_text(Some(resume_text))?;
    let analysis = backend.analyze_keywords(&resume_text, job_data).await?;
    info!(
        match_score = analysis.match_score,
        actionable = analysis.actionable_keywords.len(),
        "Keyword analysis complete"
    );
    Ok(analysis)
}

/// Full analysis. Inputs are validated before any external call is made.
pub async fn run_analysis(
    backend: &dyn ResumeBackend,
    llm: &LlmClient,
    upload: Option<&ResumeUpload>,
    job_description: &str,
) -> Result<AnalysisOutcome, AppError> {
    validate_resume_upload(upload)?;
    validate_job_description(job_description)?;

    let job_data = structure_job(llm, job_description).await?;
    let extracted = extract_resume(backend, upload).await?;
    let analysis = analyze_keywords(backend, &extracted.resume_text, &job_data).await?;

    Ok(AnalysisOutcome {
        job_data,
        resume_text: extracted.resume_text,
        analysis,
    })
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::backend::BackendOperation;
    use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
    use crate::workflow::testing::FakeBackend;

    fn pdf_upload() -> ResumeUpload {
        ResumeUpload {
            filename: "jane.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from_static(b"%PDF-1.5 fake"),
        }
    }

    fn unconfigured_llm() -> LlmClient {
        LlmClient::new(None, DEFAULT_MODEL.to_string(), DEFAULT_BASE_URL.to_string()).unwrap()
    }

    #[test]
    fn test_missing_upload_is_validation_error() {
        assert!(matches!(validate_resume_upload(None), Err(AppError::Validation(_))));
        let empty = ResumeUpload {
            bytes: Bytes::new(),
            ..pdf_upload()
        };
        assert!(matches!(
            validate_resume_upload(Some(&empty)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_pdf_accepted_by_type_or_extension() {
        let by_name = ResumeUpload {
            content_type: Some("application/octet-stream".to_string()),
            filename: "Resume.PDF".to_string(),
            ..pdf_upload()
        };
        assert!(validate_resume_upload(Some(&by_name)).is_ok());

        let by_type = ResumeUpload {
            filename: "resume".to_string(),
            ..pdf_upload()
        };
        assert!(validate_resume_upload(Some(&by_type)).is_ok());
    }

    #[test]
    fn test_docx_is_unsupported() {
        let docx = ResumeUpload {
            filename: "resume.docx".to_string(),
            content_type: Some(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string(),
            ),
            ..pdf_upload()
        };
        assert!(matches!(
            validate_resume_upload(Some(&docx)),
            Err(AppError::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn test_upload_size_limit() {
        let at_limit = ResumeUpload {
            bytes: Bytes::from(vec![b'x'; MAX_UPLOAD_BYTES]),
            ..pdf_upload()
        };
        assert!(validate_resume_upload(Some(&at_limit)).is_ok());

        let oversized = ResumeUpload {
            bytes: Bytes::from(vec![b'x'; MAX_UPLOAD_BYTES + 1]),
            ..pdf_upload()
        };
        match validate_resume_upload(Some(&oversized)) {
            Err(AppError::FileTooLarge(msg)) => assert!(msg.contains("10 MB")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_blank_job_description_rejected() {
        assert!(matches!(
            validate_job_description(" \n\t "),
            Err(AppError::Validation(_))
        ));
        assert_eq!(validate_job_description("  Rust dev ").unwrap(), "Rust dev");
    }

    #[test]
    fn test_short_text_is_extraction_failure() {
        assert!(matches!(
            require_resume_text(Some("Jane Doe")),
            Err(AppError::ExtractionFailed(_))
        ));
        assert!(matches!(require_resume_text(None), Err(AppError::ExtractionFailed(_))));
        let long = "x".repeat(MIN_RESUME_TEXT_LEN);
        assert_eq!(require_resume_text(Some(&long)).unwrap(), long);
    }

    #[tokio::test]
    async fn test_extract_resume_returns_text() {
        let backend = FakeBackend::default();
        let extracted = extract_resume(&backend, Some(&pdf_upload())).await.unwrap();
        assert!(extracted.resume_text.starts_with("Jane Doe"));
        assert_eq!(extracted.filename, "jane.pdf");
        assert_eq!(backend.calls(), vec![BackendOperation::ExtractText]);
    }

    #[tokio::test]
    async fn test_extract_resume_rejects_scanned_pdf() {
        let backend = FakeBackend {
            extracted_text: "   ".to_string(),
            ..FakeBackend::default()
        };
        let err = extract_resume(&backend, Some(&pdf_upload())).await.unwrap_err();
        assert!(matches!(err, AppError::ExtractionFailed(_)));
    }

    #[tokio::test]
    async fn test_extract_timeout_surfaces_without_retry() {
        let backend = FakeBackend {
            timeout_on: Some(BackendOperation::ExtractText),
            ..FakeBackend::default()
        };
        let err = extract_resume(&backend, Some(&pdf_upload())).await.unwrap_err();
        assert!(matches!(err, AppError::Backend(_)));
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_run_analysis_validates_before_calling_out() {
        let backend = FakeBackend::default();
        let llm = unconfigured_llm();
        let err = run_analysis(&backend, &llm, Some(&pdf_upload()), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_run_analysis_without_llm_key_fails_before_backend() {
        let backend = FakeBackend::default();
        let llm = unconfigured_llm();
        let err = run_analysis(&backend, &llm, Some(&pdf_upload()), "Rust engineer")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(crate::llm_client::LlmError::NotConfigured)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_keywords_passes_through() {
        let backend = FakeBackend::default();
        let result = analyze_keywords(&backend, &backend.extracted_text, &JobData::default())
            .await
            .unwrap();
        assert_eq!(result.match_score, 55.0);
    }
}
