//! Words never highlighted in the preview: filler, months, and vocabulary that
//! shows up in nearly every resume regardless of the job.

use std::collections::HashSet;

use once_cell::sync::Lazy;

#[rustfmt::skip]
const WORDS: &[&str] = &[
    // articles, conjunctions, prepositions
    "the", "a", "an", "and", "or", "but", "nor", "so", "yet", "for",
    "in", "on", "at", "to", "of", "with", "by", "from", "as", "into",
    "through", "during", "before", "after", "above", "below", "between",
    "under", "over", "out", "up", "down", "off", "about", "against",
    "within", "without", "along", "around", "among", "across", "behind",
    "beyond", "near", "upon", "per",
    // pronouns
    "i", "me", "my", "mine", "we", "us", "our", "ours",
    "you", "your", "yours", "he", "him", "his", "she", "her", "hers",
    "it", "its", "they", "them", "their", "theirs",
    "this", "that", "these", "those", "who", "whom", "whose", "which", "what",
    // auxiliaries
    "is", "are", "was", "were", "be", "been", "being",
    "have", "has", "had", "having", "do", "does", "did", "doing",
    // other common words
    "not", "no", "yes", "all", "each", "every", "both", "few", "more",
    "most", "other", "some", "such", "only", "own", "same", "than",
    "too", "very", "just", "also", "now", "here", "there", "then",
    "once", "if", "when", "where", "why", "how", "any", "many", "much",
    "will", "would", "could", "should", "may", "might", "must", "shall", "can",
    // months
    "january", "february", "march", "april", "june",
    "july", "august", "september", "october", "november", "december",
    "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    // section and structural words
    "expected", "present", "current", "relevant", "courses", "course",
    "technologies", "technology", "tools", "tool", "prototyping",
    "skills", "skill", "experience", "experiences", "education",
    "projects", "project", "work", "professional", "summary", "objective",
    "certifications", "certification", "awards", "award", "honors", "honor",
    "languages", "language", "interests", "interest", "activities", "activity",
    "leadership", "volunteer", "publications", "publication", "references",
    // email and url parts
    "gmail", "com", "edu", "org", "net", "linkedin", "github", "https", "http", "www",
    // locations
    "remote", "city", "state", "street", "avenue", "road", "drive",
    // degrees
    "bachelor", "master", "doctor", "associate", "degree", "science", "arts",
    "engineering", "business", "administration", "computer", "information",
    // job titles
    "engineer", "developer", "analyst", "manager", "director", "lead",
    "senior", "junior", "intern", "internship", "assistant",
    "specialist", "coordinator", "consultant", "architect", "designer",
    // generic tech
    "software", "development", "programming", "application", "applications",
    "system", "systems", "data", "database", "web", "mobile", "cloud",
    "full", "stack", "front", "end", "back", "frontend", "backend",
    // action verbs
    "using", "used", "based", "including", "included", "developed", "created",
    "designed", "implemented", "built", "managed", "led", "worked",
    "collaborated", "contributed", "improved", "increased", "decreased",
    "achieved", "completed", "delivered", "established", "maintained",
];

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| WORDS.iter().copied().collect());

/// `word` must already be cleaned (lower-case, punctuation stripped).
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}
