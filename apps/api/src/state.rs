use std::sync::Arc;

use crate::config::Config;
use crate::generation::client::ContentGenerationClient;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Pluggable content provider. Default: GeminiContentClient.
    pub generator: Arc<dyn ContentGenerationClient>,
    pub config: Config,
}
