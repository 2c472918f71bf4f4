//! Bullet-glyph normalization.
//!
//! AI-rewritten resumes arrive with whatever bullet glyphs the source PDF used,
//! plus a few byte sequences left behind by a legacy font-encoding mismatch
//! (`%Ï`, `¡`). Everything is rewritten to [`BULLET`] so the classifier only
//! has to recognise one marker.
//!
//! The glyph list is a compatibility set for previously generated text, not a
//! general Unicode bullet taxonomy.

use once_cell::sync::Lazy;
use regex::Regex;

/// The canonical bullet marker.
pub const BULLET: char = '•';

/// Whole-document patterns. Each is anchored at line start after indentation;
/// group 1 captures the indentation so it survives the rewrite.
static DOCUMENT_BULLETS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^([ \t]*)%[^\s][ \t]*",
        r"^([ \t]*)%[ÏIi][ \t]+",
        r"^([ \t]*)¡[ \t]+",
        r"^([ \t]*)·[ \t]+",
        r"^([ \t]*)•[ \t]*",
        r"^([ \t]*)●[ \t]*",
        r"^([ \t]*)○[ \t]*",
        r"^([ \t]*)◦[ \t]*",
        r"^([ \t]*)▪[ \t]*",
        r"^([ \t]*)▫[ \t]*",
        r"^([ \t]*)■[ \t]*",
        r"^([ \t]*)□[ \t]*",
        r"^([ \t]*)►[ \t]*",
        r"^([ \t]*)▻[ \t]*",
        r"^([ \t]*)»[ \t]*",
        r"^([ \t]*)›[ \t]*",
        r"^([ \t]*)–[ \t]*",
        r"^([ \t]*)—[ \t]*",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Single-line patterns used when a line is about to be drawn as a bullet.
/// Wider than the document set: ASCII markers are only safe to strip once the
/// line is already known to be a bullet.
static LINE_BULLETS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^%[ÏIi]\s+",
        r"^¡\s+",
        r"^·\s+",
        r"^•\s*",
        r"^●\s*",
        r"^○\s*",
        r"^◦\s*",
        r"^▪\s*",
        r"^▫\s*",
        r"^■\s*",
        r"^□\s*",
        r"^►\s*",
        r"^▻\s*",
        r"^➢\s*",
        r"^➤\s*",
        r"^→\s*",
        r"^»\s*",
        r"^›\s*",
        r"^>\s*",
        r"^-\s*",
        r"^–\s*",
        r"^—\s*",
        r"^\*\s*",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static LEADING_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^•\s*").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Prefix characters that mark a raw (not yet normalized) bullet line.
const RAW_BULLET_PREFIXES: &[char] = &[
    '●', '•', '-', '*', '○', '◦', '▪', '▫', '■', '□', '►', '▻', '➢', '➤', '→', '»', '›', '>', '%',
];

/// Prefixes that only count as bullets when followed by whitespace.
const SPACED_BULLET_PREFIXES: &[char] = &['¡', '·', '–', '—'];

/// Rewrites every recognised bullet variant at the start of a line to
/// `"• "`. Indentation and the rest of the line are left untouched.
///
/// Idempotent: `normalize_bullets(&normalize_bullets(t)) == normalize_bullets(t)`.
pub fn normalize_bullets(text: &str) -> String {
    text.split('\n')
        .map(normalize_document_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize_document_line(line: &str) -> String {
    let mut current = line.to_string();
    for pattern in DOCUMENT_BULLETS.iter() {
        if pattern.is_match(&current) {
            current = pattern.replace(&current, "${1}• ").into_owned();
        }
    }
    current
}

/// True if the trimmed line starts with the canonical marker or any raw
/// bullet variant.
pub fn starts_with_bullet(text: &str) -> bool {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if RAW_BULLET_PREFIXES.contains(&first) {
        return true;
    }
    SPACED_BULLET_PREFIXES.contains(&first) && chars.next().is_some_and(char::is_whitespace)
}

/// Returns the text of a bullet line without its marker, with internal
/// whitespace runs collapsed to one space.
pub fn bullet_content(line: &str) -> String {
    let trimmed = line.trim();
    let mut normalized = trimmed.to_string();
    if let Some(pattern) = LINE_BULLETS.iter().find(|p| p.is_match(trimmed)) {
        normalized = pattern.replace(trimmed, "• ").into_owned();
    }
    let without_marker = LEADING_BULLET.replace(&normalized, "");
    WHITESPACE_RUN
        .replace_all(&without_marker, " ")
        .trim()
        .to_string()
}
