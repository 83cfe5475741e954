mod config;
mod errors;
mod metrics;
mod parsing;
mod profile;
mod routes;
mod skills;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::metrics::MetricsCollector;
use crate::parsing::service::ParserService;
use crate::routes::build_router;
use crate::skills::SkillsCatalog;
use crate::state::AppState;
use crate::storage::LocalDocumentStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Scout Parser API v{}", env!("CARGO_PKG_VERSION"));

    // Build the alias catalog once; the canonicalizer and the skills
    // endpoints share the same handle.
    let skills = Arc::new(SkillsCatalog::builtin());
    info!("Skills catalog initialized");

    let metrics = Arc::new(MetricsCollector::new());

    let store = Arc::new(LocalDocumentStore::new(config.data_root.clone()));
    info!(data_root = %config.data_root, "Document store initialized");

    let parser = Arc::new(ParserService::new(
        store,
        Arc::clone(&skills),
        Arc::clone(&metrics),
        config.max_file_size,
    ));

    let state = AppState {
        config: config.clone(),
        skills,
        metrics,
        parser,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
