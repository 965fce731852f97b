mod config;
mod errors;
mod intake;
mod models;
mod ranking;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::ranking::similarity::{RelevanceScorer, TfIdfScorer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (invalid values abort startup)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ranker API v{}", env!("CARGO_PKG_VERSION"));

    let weights = config.scoring.weights;
    info!(
        skill = weights.skill,
        experience = weights.experience,
        education = weights.education,
        experience_cap_years = config.scoring.experience_cap_years,
        education_levels = config.scoring.education_ranks.len(),
        "Scoring weights loaded"
    );

    // Relevance backend (TF-IDF by default; any RelevanceScorer can be swapped in)
    let relevance: Arc<dyn RelevanceScorer> = Arc::new(TfIdfScorer);
    info!("Relevance backend: {}", relevance.backend());

    let state = AppState {
        config: config.clone(),
        relevance,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
