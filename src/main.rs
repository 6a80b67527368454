//! J.A.R.V.I.S. gateway
//!
//! HTTP backend for the J.A.R.V.I.S. voice/text assistant. Chat messages are
//! forwarded to a hosted LLM; when the model answers with a structured
//! command the gateway runs the matching local action (open a site, launch a
//! program, power control, remember a note) and replies with a confirmation.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod actions;
mod config;
mod conversation;
mod core;
mod providers;
mod routes;
mod system;

use actions::{Dispatcher, SystemLauncher};
use config::Config;
use core::{ChatEngine, MemoryStore};
use providers::Provider;

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
                .unwrap_or_else(|_| "jarvis_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let provider = Provider::from_settings(&config.llm)?;
    if !provider.is_configured() {
        tracing::warn!(
            provider = provider.name(),
            "API key missing; chat requests will fail until it is set"
        );
    }

    let memory = Arc::new(MemoryStore::new(&config.memory_path));
    tracing::info!(path = %config.memory_path.display(), "Using memory file");

    if config.actions.allow_power_actions {
        tracing::warn!(
            delay_minutes = config.actions.power_delay_minutes,
            "Power actions are ENABLED"
        );
    }

    let dispatcher = Dispatcher::new(
        Arc::new(SystemLauncher::new()),
        memory.clone(),
        config.actions.clone(),
    );

    let chat_engine = Arc::new(ChatEngine::new(provider, dispatcher, memory));

    let app = routes::app(AppState { chat_engine });

    tracing::info!(
        model = %config.llm.model,
        "🤖 J.A.R.V.I.S. gateway running at http://{}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
