//! Prospecto - grounded pharmaceutical leaflet chat
//!
//! A Rust backend implementing a session state machine for searching a
//! public drug registry and chatting with an LLM constrained to one
//! product's official leaflet.

mod api;
mod cache;
mod chat;
mod config;
mod filter;
mod leaflet;
mod llm;
mod prompt;
mod registry;
mod runtime;
mod session;

use api::{create_router, AppState};
use config::Config;
use leaflet::LeafletClient;
use llm::GroqService;
use registry::RegistryClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prospecto=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env();

    // Missing LLM credentials are the only fatal condition: without them
    // no session could ever complete a chat turn.
    let Some(api_key) = config.api_key.clone() else {
        tracing::error!("GROQ_API_KEY is not set; refusing to start");
        return Err("GROQ_API_KEY is required".into());
    };

    let registry_client = Arc::new(RegistryClient::new(config.registry_base_url.clone()));
    let leaflet_client = Arc::new(LeafletClient::new(config.registry_base_url.clone()));
    let chat_service = Arc::new(GroqService::new(
        api_key,
        config.model.clone(),
        config.llm_base_url.clone(),
    ));

    tracing::info!(
        model = %config.model,
        registry = %config.registry_base_url,
        "Clients initialized"
    );

    let state = AppState::new(registry_client, leaflet_client, chat_service);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Prospecto server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
