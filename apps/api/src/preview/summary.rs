use serde::Serialize;

use crate::models::optimization::ResumeChange;

const STRONG_THRESHOLD: f64 = 80.0;
const FAIR_THRESHOLD: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Strong,
    Fair,
    Weak,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= STRONG_THRESHOLD {
            ScoreBand::Strong
        } else if score >= FAIR_THRESHOLD {
            ScoreBand::Fair
        } else {
            ScoreBand::Weak
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub ats_score: f64,
    pub band: ScoreBand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_score: Option<f64>,
    /// `ats_score - original_score`, when the original score is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvement: Option<f64>,
}

impl ScoreSummary {
    pub fn new(ats_score: f64, original_score: Option<f64>) -> Self {
        Self {
            ats_score,
            band: ScoreBand::from_score(ats_score),
            original_score,
            improvement: original_score.map(|original| ats_score - original),
        }
    }
}

/// The "Changes Made" panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangesSummary {
    pub total: usize,
    pub changes: Vec<ResumeChange>,
    /// Every reported keyword, first spelling wins, case-insensitive dedup.
    pub keywords_added: Vec<String>,
}

impl ChangesSummary {
    pub fn from_changes(changes: &[ResumeChange]) -> Self {
        let mut seen = std::collections::HashSet::new();
        let keywords_added = changes
            .iter()
            .flat_map(|change| change.keywords_added.iter())
            .map(|keyword| keyword.trim())
            .filter(|keyword| !keyword.is_empty())
            .filter(|keyword| seen.insert(keyword.to_lowercase()))
            .map(str::to_string)
            .collect();
        Self {
            total: changes.len(),
            changes: changes.to_vec(),
            keywords_added,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_band_thresholds() {
        assert_eq!(ScoreBand::from_score(80.0), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(79.9), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(60.0), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(12.0), ScoreBand::Weak);
    }

    #[test]
    fn test_improvement_only_with_original_score() {
        let summary = ScoreSummary::new(86.0, Some(62.0));
        assert_eq!(summary.improvement, Some(24.0));
        assert_eq!(summary.band, ScoreBand::Strong);
        assert_eq!(ScoreSummary::new(70.0, None).improvement, None);
    }

    #[test]
    fn test_changes_summary_dedups_keywords() {
        let changes = vec![
            ResumeChange {
                section: "Skills".to_string(),
                description: "Added cloud tooling".to_string(),
                keywords_added: vec!["Kubernetes".to_string(), "Terraform".to_string()],
            },
            ResumeChange {
                section: "Experience".to_string(),
                description: "Reworded deployment bullet".to_string(),
                keywords_added: vec!["kubernetes".to_string(), " ".to_string()],
            },
        ];
        let summary = ChangesSummary::from_changes(&changes);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.keywords_added, vec!["Kubernetes", "Terraform"]);
    }
}
