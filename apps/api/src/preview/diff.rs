//! Word-level highlighting of content the optimizer introduced.
//!
//! A word lights up only when it is genuinely new: absent from the line it
//! most likely replaced, absent from the whole original document, and not a
//! stop word. Reworded lines built from existing vocabulary stay quiet.
//!
//! The best-match search compares every optimized line with every original
//! line. That is fine for resumes (tens of lines) but quadratic in general.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::stopwords::is_stop_word;
use crate::models::optimization::ResumeChange;
use crate::render::classify::SECTION_HEADERS;

/// Extra names treated as headers in the preview only.
const PREVIEW_ONLY_HEADERS: &[&str] = &["CONTACT", "PROFILE", "ABOUT"];

static ZERO_WIDTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\u{200B}-\u{200D}\u{FEFF}]").unwrap());
static SPECIAL_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{00A0}\u{202F}\u{2007}\u{2060}\u{2028}\u{2029}\t\r]").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
/// Whitespace runs and the words between them, in order.
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+|\S+").unwrap());

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub text: String,
    pub highlighted: bool,
    /// The cleaned word is one of the optimizer's reported keywords.
    pub added_keyword: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreviewLine {
    Blank,
    /// Section header, shown as one bold block and never tokenized.
    Header { text: String },
    Tokens { tokens: Vec<Token> },
}

// ────────────────────────────────────────────────────────────────────────────
// Text cleanup
// ────────────────────────────────────────────────────────────────────────────

/// Strips zero-width characters, maps special spaces to a plain space and
/// collapses whitespace runs.
pub fn normalize_text(text: &str) -> String {
    let without_zero_width = ZERO_WIDTH.replace_all(text, "");
    let spaced = SPECIAL_SPACE.replace_all(&without_zero_width, " ");
    WHITESPACE_RUN.replace_all(&spaced, " ").trim().to_string()
}

/// Lower-cased ASCII word characters only.
pub fn clean_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Cleaned words (length > 1) from every change's `keywordsAdded`.
pub fn added_keyword_set(changes: &[ResumeChange]) -> HashSet<String> {
    changes
        .iter()
        .flat_map(|change| change.keywords_added.iter())
        .flat_map(|keyword| keyword.split_whitespace())
        .map(clean_word)
        .filter(|word| word.len() > 1)
        .collect()
}

fn is_preview_header(text: &str) -> bool {
    let upper = normalize_text(text).to_uppercase();
    SECTION_HEADERS
        .iter()
        .chain(PREVIEW_ONLY_HEADERS)
        .any(|header| {
            upper == *header
                || upper.starts_with(&format!("{header} "))
                || upper.ends_with(&format!(" {header}"))
        })
}

// ────────────────────────────────────────────────────────────────────────────
// Original-document index
// ────────────────────────────────────────────────────────────────────────────

struct OriginalIndex {
    words: HashSet<String>,
    lower_text: String,
    /// Normalized, lower-cased lines.
    lines: Vec<String>,
    line_words: Vec<HashSet<String>>,
}

impl OriginalIndex {
    fn build(original: &str) -> Self {
        let normalized = normalize_text(original);
        let mut words = HashSet::new();
        for word in normalized.split_whitespace() {
            let clean = clean_word(word);
            if !clean.is_empty() {
                words.insert(clean);
            }
            if word.contains('-') {
                for part in word.split('-').map(clean_word) {
                    if part.len() > 1 {
                        words.insert(part);
                    }
                }
            }
        }

        let lines: Vec<String> = original
            .split('\n')
            .map(|line| normalize_text(line).to_lowercase())
            .collect();
        let line_words = lines
            .iter()
            .map(|line| line.split_whitespace().map(clean_word).collect())
            .collect();

        Self {
            words,
            lower_text: normalized.to_lowercase(),
            lines,
            line_words,
        }
    }

    fn contains(&self, clean: &str) -> bool {
        self.words.contains(clean) || self.lower_text.contains(clean)
    }

    /// Words of `line` absent from the best-matching original line, or `None`
    /// when no original line shares a word (every word is then a candidate).
    /// Empty when the line exists verbatim in the original.
    fn candidates(&self, line: &str) -> Option<HashSet<String>> {
        let normalized = normalize_text(line).to_lowercase();
        if self.lines.contains(&normalized) {
            return Some(HashSet::new());
        }

        let words: Vec<String> = normalized.split_whitespace().map(clean_word).collect();
        let mut best: Option<(usize, usize)> = None;
        for (index, original_words) in self.line_words.iter().enumerate() {
            let score = words.iter().filter(|w| original_words.contains(*w)).count();
            if score > 0 && best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }

        let (index, _) = best?;
        let matched = &self.line_words[index];
        Some(
            words
                .into_iter()
                .filter(|w| w.len() > 1 && !matched.contains(w))
                .collect(),
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Highlighting
// ────────────────────────────────────────────────────────────────────────────

/// Tokenizes each optimized line and marks the genuinely new words.
pub fn highlight(
    original: &str,
    optimized: &str,
    added_keywords: &HashSet<String>,
) -> Vec<PreviewLine> {
    let index = OriginalIndex::build(original);

    optimized
        .split('\n')
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return PreviewLine::Blank;
            }
            if is_preview_header(trimmed) {
                return PreviewLine::Header {
                    text: trimmed.to_string(),
                };
            }

            let candidates = index.candidates(trimmed);
            let tokens = TOKEN
                .find_iter(line.trim_end_matches('\r'))
                .map(|m| {
                    let text = m.as_str();
                    if text.trim().is_empty() {
                        return Token {
                            text: text.to_string(),
                            highlighted: false,
                            added_keyword: false,
                        };
                    }
                    let clean = clean_word(text);
                    let is_candidate = candidates.as_ref().map_or(true, |set| set.contains(&clean));
                    let highlighted = is_candidate
                        && clean.len() > 1
                        && !is_stop_word(&clean)
                        && !index.contains(&clean);
                    Token {
                        text: text.to_string(),
                        highlighted,
                        added_keyword: added_keywords.contains(&clean),
                    }
                })
                .collect();
            PreviewLine::Tokens { tokens }
        })
        .collect()
}
