//! Download filename: `{name}_{YYYY-MM-DD}_{company}.{ext}`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const FALLBACK_NAME: &str = "Resume";

static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Output format of a rendered resume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pdf,
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Text => "txt",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Text => "text/plain; charset=utf-8",
        }
    }
}

/// Drops everything but ASCII word characters, whitespace and hyphens, then
/// joins words with underscores.
pub fn clean_segment(value: &str) -> String {
    let stripped = DISALLOWED.replace_all(value.trim(), "");
    WHITESPACE_RUN
        .replace_all(stripped.trim(), "_")
        .into_owned()
}

pub fn download_filename(
    optimized_resume: &str,
    company: Option<&str>,
    date: NaiveDate,
    format: OutputFormat,
) -> String {
    let first_line = optimized_resume.lines().next().unwrap_or_default();
    let mut name = clean_segment(first_line);
    if name.is_empty() {
        name = FALLBACK_NAME.to_string();
    }
    let company = company.map(clean_segment).unwrap_or_default();
    let date = date.format("%Y-%m-%d");
    let ext = format.extension();

    if company.is_empty() {
        format!("{name}_{date}.{ext}")
    } else {
        format!("{name}_{date}_{company}.{ext}")
    }
}
