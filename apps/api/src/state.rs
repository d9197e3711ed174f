use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::search::JobSearch;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Job search backend. Default: `SerpApiClient`.
    pub search: Arc<dyn JobSearch>,
    /// Cover letter generator. Default: `LlmClient` (Gemini).
    pub generator: Arc<dyn TextGenerator>,
}
