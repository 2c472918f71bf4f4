// Side-by-side preview: highlighted optimized text, change list, score band.

pub mod diff;
pub mod handlers;
pub mod stopwords;
pub mod summary;

pub use diff::{added_keyword_set, highlight, PreviewLine};
pub use summary::{ChangesSummary, ScoreBand, ScoreSummary};
