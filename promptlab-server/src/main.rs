//! Promptlab relay server - forwards playground requests to an
//! OpenAI-compatible completion API.

use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod error;
mod llm;
mod state;

use llm::OpenAiCompatibleCompletions;
use promptlab_engine::engine::{EngineConfig, PlaygroundEngine};
use state::AppState;

const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Parser)]
#[command(
    name = "promptlab-server",
    about = "HTTP relay between the prompt playground and a completion API",
    version = env!("CARGO_PKG_VERSION")
)]
struct ServerArgs {
    /// Host to bind to
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BindConfig {
    host: String,
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "promptlab_server=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let env = |key: &str| std::env::var(key).ok();

    let engine_cfg = engine_config_from_env(env);
    if engine_cfg.llm_api_key.trim().is_empty() {
        warn!("LLM_API_KEY is empty; upstream calls will fail until it is set");
    }
    info!("Completion API base URL: {}", engine_cfg.llm_base_url);

    let engine = PlaygroundEngine::new(engine_cfg, Arc::new(OpenAiCompatibleCompletions));
    let state = AppState::new(engine);

    let app = api::create_router(state);

    let bind = resolve_bind_config(&args, env);
    let addr = format!("{}:{}", bind.host, bind.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Relay listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn engine_config_from_env(env: impl Fn(&str) -> Option<String>) -> EngineConfig {
    EngineConfig {
        llm_base_url: env("LLM_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.into()),
        llm_api_key: env("LLM_API_KEY").unwrap_or_default(),
    }
}

fn resolve_bind_config(args: &ServerArgs, env: impl Fn(&str) -> Option<String>) -> BindConfig {
    let host = args
        .host
        .clone()
        .or_else(|| env("PROMPTLAB_HOST").map(|raw| raw.trim().to_string()))
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "0.0.0.0".to_string());

    let port = args.port.unwrap_or_else(|| match env("PROMPTLAB_PORT") {
        Some(raw) => match raw.trim().parse::<u16>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Invalid PROMPTLAB_PORT='{}', falling back to 5000", raw);
                5000
            }
        },
        None => 5000,
    });

    BindConfig { host, port }
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        },
    }
}
