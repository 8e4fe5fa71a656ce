mod assist;
mod compose;
mod config;
mod design;
mod errors;
mod export;
mod models;
mod render;
mod routes;
mod scoring;
mod session;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assist::credentials::FileCredentialStore;
use crate::assist::extract::PdfTextExtractor;
use crate::assist::llm_client::LlmClient;
use crate::config::Config;
use crate::design::DesignRegistry;
use crate::render::fonts::FontLibrary;
use crate::routes::build_router;
use crate::scoring::ScoringPolicy;
use crate::session::{spawn_reaper, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio API v{}", env!("CARGO_PKG_VERSION"));

    // Design tables and embedded faces are built once and shared read-only
    let registry = DesignRegistry::builtin();
    info!(
        "Design registry loaded: {} palettes, {} font pairings, {} variations",
        registry.palettes().len(),
        registry.fonts().len(),
        registry.variations().len()
    );
    let fonts = FontLibrary::load().context("loading embedded fonts")?;

    let policy = ScoringPolicy::default();
    info!("Scoring policy {}", policy.version);

    // Initialize LLM client (the key comes from each caller's stored credential)
    let llm = LlmClient::new(config.llm_model.clone()).context("building HTTP client")?;
    info!("LLM client initialized (model: {})", llm.model());

    let credentials = FileCredentialStore::new(config.credential_store.clone());
    info!("Credential store at {}", credentials.path().display());

    info!(
        "Export: {:?} paper, raster scale {}",
        config.paper, config.export_scale
    );

    // Abandoned documents are reclaimed after the idle TTL
    let sessions = Arc::new(SessionStore::new());
    spawn_reaper(Arc::clone(&sessions), config.session_ttl);
    info!("Idle documents expire after {}s", config.session_ttl.as_secs());

    // Build app state
    let state = AppState {
        config: config.clone(),
        registry: Arc::new(registry),
        policy: Arc::new(policy),
        fonts: Arc::new(fonts),
        sessions,
        credentials: Arc::new(credentials),
        generator: Arc::new(llm),
        extractor: Arc::new(PdfTextExtractor),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
