mod config;
mod errors;
mod llm_client;
mod matching;
mod models;
mod resume;
mod routes;
mod search;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::http::HeaderValue;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::search::SerpApiClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
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

    info!("Starting Job Match API v{}", env!("CARGO_PKG_VERSION"));

    // Missing keys are not fatal: the affected stage reports no results.
    if config.serpapi_key.is_none() {
        warn!("SERPAPI_KEY not set; job search will return no results");
    }
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set; cover letters will not be generated");
    }

    let search = SerpApiClient::new(
        config.serpapi_key.clone(),
        config.serpapi_endpoint.clone(),
        Duration::from_secs(config.search_timeout_secs),
    )?;
    info!("Search client initialized (endpoint: {})", config.serpapi_endpoint);

    let llm = LlmClient::new(config.gemini_api_key.clone(), config.gemini_endpoint.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    std::fs::create_dir_all(&config.work_dir)?;
    info!("Job hand-off directory: {}", config.work_dir.display());

    let state = AppState {
        config: config.clone(),
        search: Arc::new(search),
        generator: Arc::new(llm),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(&config.cors_allowed_origins));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS restricted to the configured frontend origins. Unparseable entries are skipped.
fn build_cors(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
