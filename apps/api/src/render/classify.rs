//! Line classification.
//!
//! Each line of the normalized resume gets exactly one [`Role`]. The rules
//! are an ordered table evaluated top to bottom; the first predicate that
//! matches wins. Structural cues (position, explicit headers) come before
//! soft pattern matches (dates, colons), and bullets are excluded from the
//! date rules so an achievement mentioning a year stays a bullet.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::normalize::starts_with_bullet;

/// Section names recognised as headers, matched against the upper-cased line.
pub const SECTION_HEADERS: &[&str] = &[
    "EDUCATION",
    "TECHNICAL SKILLS",
    "SKILLS",
    "WORK EXPERIENCE",
    "EXPERIENCE",
    "TECHNICAL PROJECTS",
    "HONORS & AWARDS",
    "PROJECTS",
    "LEADERSHIP AND PROFESSIONAL DEVELOPMENT",
    "LEADERSHIP",
    "PROFESSIONAL AFFILIATIONS",
    "INTERESTS",
    "CERTIFICATIONS",
    "AWARDS",
    "SUMMARY",
    "OBJECTIVE",
    "PROFESSIONAL EXPERIENCE",
    "PROFESSIONAL EXPERIENCES",
    "LANGUAGES",
    "VOLUNTEER",
    "PUBLICATIONS",
];

static SKILL_CATEGORY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s/]+:").unwrap());

static MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec|January|February|March|April|June|July|August|September|October|November|December)\s*\d{4}",
    )
    .unwrap()
});

static YEAR_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\d{4}\s*[-–—]\s*(Present|\d{4})").unwrap());

static YEAR_DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}\s*[-–—]").unwrap());

static STATE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*[A-Z]{2}\b").unwrap());

static LOCATION_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(Remote|Houston|TX|IN|KY|DC|NC)\b").unwrap());

/// First run of two or more whitespace characters, or a tab.
static COLUMN_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}|\t").unwrap());

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Name,
    ContactInfo,
    SectionHeader,
    SkillCategory,
    CompanyLine,
    JobTitleLine,
    BulletItem,
    PlainText,
    Blank,
}

impl Role {
    /// Roles drawn as a left/right pair on one baseline.
    pub fn is_two_column(self) -> bool {
        matches!(self, Role::CompanyLine | Role::JobTitleLine)
    }
}

/// Left and right halves of a two-column line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitPair {
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedLine {
    pub text: String,
    pub role: Role,
    pub split: Option<SplitPair>,
}

/// What a rule predicate gets to look at.
struct LineContext<'a> {
    text: &'a str,
    line_index: usize,
    is_first_non_blank: bool,
}

struct ClassificationRule {
    role: Role,
    matches: fn(&LineContext<'_>) -> bool,
}

/// Precedence order. Blank is handled before the table.
static RULES: &[ClassificationRule] = &[
    ClassificationRule {
        role: Role::Name,
        matches: |ctx| ctx.is_first_non_blank,
    },
    ClassificationRule {
        role: Role::ContactInfo,
        matches: |ctx| ctx.line_index == 1 && is_contact_line(ctx.text),
    },
    ClassificationRule {
        role: Role::SectionHeader,
        matches: |ctx| is_section_header(ctx.text),
    },
    ClassificationRule {
        role: Role::SkillCategory,
        matches: |ctx| SKILL_CATEGORY.is_match(ctx.text),
    },
    ClassificationRule {
        role: Role::JobTitleLine,
        matches: |ctx| has_date_range(ctx.text) && !starts_with_bullet(ctx.text),
    },
    ClassificationRule {
        role: Role::CompanyLine,
        matches: |ctx| {
            (has_location(ctx.text) || has_company_date(ctx.text)) && !starts_with_bullet(ctx.text)
        },
    },
    ClassificationRule {
        role: Role::BulletItem,
        matches: |ctx| starts_with_bullet(ctx.text),
    },
];

// ────────────────────────────────────────────────────────────────────────────
// Predicates
// ────────────────────────────────────────────────────────────────────────────

/// Exact match, or the header followed by a space (`"SKILLS & TOOLS"`).
pub fn is_section_header(text: &str) -> bool {
    let upper = text.trim().to_uppercase();
    SECTION_HEADERS
        .iter()
        .any(|header| upper == *header || starts_with_word(&upper, header))
}

fn starts_with_word(upper: &str, header: &str) -> bool {
    upper
        .strip_prefix(header)
        .is_some_and(|rest| rest.starts_with(' '))
}

fn is_contact_line(text: &str) -> bool {
    let lower = text.to_lowercase();
    let has_pipe = lower.contains('|');
    has_pipe && (lower.contains('@') || lower.contains("linkedin") || lower.contains("github"))
}

fn has_date_range(text: &str) -> bool {
    MONTH_YEAR.is_match(text) || YEAR_RANGE.is_match(text)
}

fn has_location(text: &str) -> bool {
    STATE_CODE.is_match(text) || LOCATION_KEYWORD.is_match(text)
}

fn has_company_date(text: &str) -> bool {
    MONTH_YEAR.is_match(text) || YEAR_DASH.is_match(text)
}

// ────────────────────────────────────────────────────────────────────────────
// Classification
// ────────────────────────────────────────────────────────────────────────────

/// Classifies one line. `line_index` counts non-blank lines only.
pub fn classify(line: &str, line_index: usize, is_first_non_blank: bool) -> Role {
    let text = line.trim();
    if text.is_empty() {
        return Role::Blank;
    }
    let ctx = LineContext {
        text,
        line_index,
        is_first_non_blank,
    };
    RULES
        .iter()
        .find(|rule| (rule.matches)(&ctx))
        .map(|rule| rule.role)
        .unwrap_or(Role::PlainText)
}

/// Splits a two-column line at the first column gap. The right half is every
/// remaining part joined by one space. `None` when there is no gap.
pub fn split_columns(text: &str) -> Option<SplitPair> {
    let parts: Vec<&str> = COLUMN_GAP.split(text.trim()).collect();
    if parts.len() < 2 {
        return None;
    }
    let right = parts[1..].join(" ").trim().to_string();
    if right.is_empty() {
        return None;
    }
    Some(SplitPair {
        left: parts[0].to_string(),
        right,
    })
}

/// Classifies every line of an already-normalized document.
pub fn classify_document(text: &str) -> Vec<ClassifiedLine> {
    let mut lines = Vec::new();
    let mut line_index = 0usize;

    for raw in text.split('\n') {
        let trimmed = raw.trim();
        let role = classify(trimmed, line_index, line_index == 0);
        if role != Role::Blank {
            line_index += 1;
        }
        let split = if role.is_two_column() {
            split_columns(trimmed)
        } else {
            None
        };
        lines.push(ClassifiedLine {
            text: trimmed.to_string(),
            role,
            split,
        });
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(text: &str) -> Vec<Role> {
        classify_document(text).into_iter().map(|l| l.role).collect()
    }

    #[test]
    fn test_first_non_blank_is_name() {
        assert_eq!(roles("\n\nEXPERIENCE\nfoo")[2], Role::Name);
        assert_eq!(roles("• Built APIs")[0], Role::Name);
    }

    #[test]
    fn test_contact_only_on_second_line() {
        assert_eq!(
            roles("Jane Doe\njane@example.com | 555-0100"),
            vec![Role::Name, Role::ContactInfo]
        );
        let later = roles("Jane Doe\nSUMMARY\njane@example.com | 555-0100");
        assert_eq!(later[2], Role::PlainText);
    }

    #[test]
    fn test_contact_profile_links_case_insensitive() {
        assert_eq!(classify("GitHub.com/jane | Portfolio", 1, false), Role::ContactInfo);
        assert_eq!(classify("jane@example.com", 1, false), Role::PlainText);
    }

    #[test]
    fn test_section_header_vocabulary() {
        for header in SECTION_HEADERS {
            assert_eq!(classify(header, 3, false), Role::SectionHeader, "{header}");
            assert_eq!(
                classify(&header.to_lowercase(), 3, false),
                Role::SectionHeader
            );
            let suffixed = format!("{header} AND MORE");
            assert_eq!(classify(&suffixed, 3, false), Role::SectionHeader, "{suffixed}");
        }
        assert_eq!(classify("SKILLS & TOOLS", 3, false), Role::SectionHeader);
        assert_eq!(classify("SKILLSET", 3, false), Role::PlainText);
    }

    #[test]
    fn test_skill_category() {
        assert_eq!(classify("Languages: Python, Go", 5, false), Role::SkillCategory);
        assert_eq!(classify("CI/CD Tools: Jenkins", 5, false), Role::SkillCategory);
        assert_eq!(classify("C++: templates", 5, false), Role::PlainText);
    }

    #[test]
    fn test_job_title_beats_company() {
        assert_eq!(
            classify("Senior Engineer    Jan 2020 - Present", 4, false),
            Role::JobTitleLine
        );
        assert_eq!(classify("Analyst    2016 – 2019", 4, false), Role::JobTitleLine);
        assert_eq!(classify("Analyst    2016 — 2019", 4, false), Role::JobTitleLine);
    }

    #[test]
    fn test_company_line_location_cues() {
        assert_eq!(classify("Acme Corp    Remote", 3, false), Role::CompanyLine);
        assert_eq!(classify("Initech    Austin, TX", 3, false), Role::CompanyLine);
        assert_eq!(classify("Acme Corp", 3, false), Role::PlainText);
    }

    #[test]
    fn test_bullet_with_date_stays_bullet() {
        assert_eq!(
            classify("• Shipped v2 in Jan 2021 ahead of schedule", 6, false),
            Role::BulletItem
        );
        assert_eq!(classify("- Moved to Houston office", 6, false), Role::BulletItem);
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(classify("   \t", 2, false), Role::Blank);
        let lines = roles("Jane\n\njane@x.com | linkedin.com/in/jane");
        assert_eq!(lines, vec![Role::Name, Role::Blank, Role::ContactInfo]);
    }

    #[test]
    fn test_split_columns() {
        assert_eq!(
            split_columns("Acme Corp                    Remote"),
            Some(SplitPair {
                left: "Acme Corp".to_string(),
                right: "Remote".to_string()
            })
        );
        assert_eq!(
            split_columns("Initech\tAustin, TX   USA"),
            Some(SplitPair {
                left: "Initech".to_string(),
                right: "Austin, TX USA".to_string()
            })
        );
        assert_eq!(split_columns("Acme Corp, Remote"), None);
    }

    #[test]
    fn test_two_column_lines_carry_split() {
        let lines = classify_document("Jane\nAcme Corp    Remote\nAcme Corp, Remote");
        assert!(lines[1].split.is_some());
        assert_eq!(lines[2].role, Role::CompanyLine);
        assert!(lines[2].split.is_none());
    }
}
