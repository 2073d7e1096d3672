//! SparkLearn - AI electronics tutor
//!
//! Serves a single chat page and a small JSON API behind it. Each browser
//! session keeps its conversation in memory; every user message is sent to
//! the Gemini API together with the full history and a fixed tutor persona.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod conversation;
mod core;
mod providers;
mod render;
mod routes;

use crate::config::Config;
use crate::core::ChatEngine;
use crate::providers::GeminiProvider;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub chat_engine: Arc<ChatEngine>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sparklearn=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // No credential, no service.
    let config = Config::load()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let provider = GeminiProvider::from_config(&config);
    tracing::info!("🤖 Using model {}", config.model);

    let chat_engine = Arc::new(ChatEngine::new(Arc::new(provider)));
    chat_engine.spawn_session_sweeper(config.session_idle);

    let state = AppState { chat_engine };

    let app = Router::new()
        .merge(routes::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("⚡ SparkLearn running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
