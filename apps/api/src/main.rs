mod compiler;
mod config;
mod errors;
mod llm_client;
mod pdf_text;
mod pipeline;
mod render;
mod routes;
mod schema;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{LlmClient, RetryPolicy};
use crate::pipeline::Pipeline;
use crate::render::TemplateRenderer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let retry = RetryPolicy {
        max_retries: config.llm_max_retries,
        ..RetryPolicy::fail_fast()
    };
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_timeout, retry)
        .context("Failed to build LLM client")?;
    info!(
        "LLM client initialized (model: {}, timeout: {}s, retries: {})",
        llm_client::MODEL,
        config.llm_timeout.as_secs(),
        retry.max_retries
    );

    // Load the resume template (built-in unless overridden)
    let renderer = match &config.resume_template_path {
        Some(path) => TemplateRenderer::from_path(path)
            .with_context(|| format!("Invalid resume template at {}", path.display()))?,
        None => TemplateRenderer::builtin(),
    };

    // Initialize document compiler (OnlineCompiler unless LATEX_COMPILER=local)
    let compiler = compiler::from_config(&config).context("Failed to build LaTeX compiler")?;
    info!("LaTeX compiler: {}", compiler.name());

    // Build app state. The pipeline bounds each logical model call, retries included.
    let state = AppState {
        pipeline: Pipeline::new(Arc::new(llm), renderer, retry.budget(config.llm_timeout)),
        compiler,
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
