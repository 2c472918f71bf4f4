use std::sync::Arc;

use crate::backend::ResumeBackend;
use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds clients only; no render state lives here.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable analysis backend. Default: `HttpBackend`; tests use a fake.
    pub backend: Arc<dyn ResumeBackend>,
    pub llm: LlmClient,
}
