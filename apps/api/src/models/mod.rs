pub mod formatting;
pub mod job;
pub mod keywords;
pub mod optimization;
