//! HTTP host for the rules Q&A engine.
//!
//! Exposes the core operations over a small JSON API; the engine itself is
//! transport-agnostic and lives in `rulescout-engine`.

mod routes;
mod sources;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use rulescout_core::config::{AppConfig, IngestConfig};
use rulescout_embed::embedder_from_config;
use rulescout_engine::RulesEngine;
use rulescout_text::pdf::PdfExtractor;

pub struct AppState {
    pub engine: RulesEngine,
    pub http: reqwest::Client,
    pub ingest: IngestConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    let state = Arc::new(AppState {
        engine: RulesEngine::new(
            embedder_from_config(&config.embedding),
            Arc::new(PdfExtractor::new()),
            config.chunking.clone(),
            config.retrieval.clone(),
        ),
        http: reqwest::Client::new(),
        ingest: config.ingest.clone(),
    });

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!(addr = %config.server.bind, "rulescout server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
