//! Keyword analysis types exchanged with the analysis backend.

use serde::{Deserialize, Serialize};

/// Category tag attached to an actionable keyword.
///
/// Unknown strings from the backend are preserved in `Other` rather than
/// rejected, since the category only drives grouping in the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum KeywordCategory {
    TechnicalSkill,
    Tool,
    Methodology,
    DomainKnowledge,
    SoftSkill,
    #[default]
    Skill,
    Other(String),
}

impl From<String> for KeywordCategory {
    fn from(value: String) -> Self {
        match value.trim() {
            "Technical Skill" => Self::TechnicalSkill,
            "Tool" => Self::Tool,
            "Methodology" => Self::Methodology,
            "Domain Knowledge" => Self::DomainKnowledge,
            "Soft Skill" => Self::SoftSkill,
            "Skill" | "" => Self::Skill,
            _ => Self::Other(value),
        }
    }
}

impl From<KeywordCategory> for String {
    fn from(value: KeywordCategory) -> Self {
        match value {
            KeywordCategory::TechnicalSkill => "Technical Skill".to_string(),
            KeywordCategory::Tool => "Tool".to_string(),
            KeywordCategory::Methodology => "Methodology".to_string(),
            KeywordCategory::DomainKnowledge => "Domain Knowledge".to_string(),
            KeywordCategory::SoftSkill => "Soft Skill".to_string(),
            KeywordCategory::Skill => "Skill".to_string(),
            KeywordCategory::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

/// A job-relevant term the user may choose to weave into the resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionableKeyword {
    pub keyword: String,
    #[serde(default)]
    pub category: KeywordCategory,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeywordAnalysisResult {
    pub success: bool,
    /// 0 – 100
    pub match_score: f64,
    pub missing_keywords: Vec<String>,
    pub matching_keywords: Vec<String>,
    pub missing_phrases: Vec<String>,
    pub matching_phrases: Vec<String>,
    pub total_job_keywords: u32,
    pub suggestions: Vec<String>,
    pub actionable_keywords: Vec<ActionableKeyword>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filtered_out_reasons: Option<Vec<String>>,
}
