// Resume optimization workflow: validate input, call the backend and the LLM,
// hand results back to the client. Every step reports failures immediately;
// nothing is retried on the user's behalf.

pub mod analyze;
pub mod handlers;
pub mod optimize;
pub mod prompts;

use bytes::Bytes;

/// A resume file received from the client.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}
