use serde::{Deserialize, Serialize};

use crate::models::formatting::FormattingProfile;
use crate::models::keywords::{ActionableKeyword, KeywordCategory, Priority};

/// Minimum extracted length for a resume to count as readable text.
pub const MIN_RESUME_TEXT_LEN: usize = 50;

/// Response of the backend text-extraction endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionResult {
    pub full_text: Option<String>,
    pub text: Option<String>,
    pub filename: Option<String>,
}

impl ExtractionResult {
    /// The full extracted text, falling back to the preview `text` field.
    pub fn resume_text(&self) -> Option<&str> {
        self.full_text
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.text.as_deref())
    }
}

/// One keyword as the optimization endpoint expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedKeyword {
    pub keyword: String,
    pub category: KeywordCategory,
    pub priority: Priority,
}

impl From<&ActionableKeyword> for SelectedKeyword {
    fn from(kw: &ActionableKeyword) -> Self {
        Self {
            keyword: kw.keyword.clone(),
            category: kw.category.clone(),
            priority: kw.priority,
        }
    }
}

/// Body of `POST /api/optimize-resume`.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationRequest {
    pub original_resume_text: String,
    pub selected_keywords: Vec<SelectedKeyword>,
    pub job_description: String,
    pub job_title: String,
    pub formatting_info: Option<FormattingProfile>,
}

/// One entry of the "Changes Made" summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeChange {
    pub section: String,
    pub description: String,
    pub keywords_added: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizationResult {
    pub success: bool,
    pub message: String,
    pub optimized_resume: String,
    pub changes: Vec<ResumeChange>,
    pub ats_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatting: Option<FormattingProfile>,
}

impl OptimizationResult {
    /// The formatting to render with: the backend's profile or the built-in one.
    pub fn formatting_or_default(&self) -> FormattingProfile {
        self.formatting.clone().unwrap_or_default().sanitized()
    }
}
