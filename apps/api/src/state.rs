use std::sync::Arc;

use crate::assist::credentials::CredentialStore;
use crate::assist::extract::TextExtractor;
use crate::assist::llm_client::TextGenerator;
use crate::config::Config;
use crate::design::DesignRegistry;
use crate::render::fonts::FontLibrary;
use crate::render::Canvas;
use crate::scoring::ScoringPolicy;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Built once at startup; the resolver never sees a partial registry.
    pub registry: Arc<DesignRegistry>,
    pub policy: Arc<ScoringPolicy>,
    pub fonts: Arc<FontLibrary>,
    pub sessions: Arc<SessionStore>,
    pub credentials: Arc<dyn CredentialStore>,
    /// Pluggable text generator. Default: `LlmClient`.
    pub generator: Arc<dyn TextGenerator>,
    pub extractor: Arc<dyn TextExtractor>,
}

impl AppState {
    /// Paint target for documents rendered from now on.
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.fonts.clone(), self.config.paper)
    }
}
