//! services/api/src/bin/api.rs

use api_lib::{
    adapters::GeminiChatAdapter,
    config::Config,
    error::ApiError,
    web::{self, state::AppState},
};
use axum::http::HeaderValue;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wellness_core::{content::SETUP_NOTICE, ports::ConversationService};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize the Chat Adapter ---
    let chat_service: Option<Arc<dyn ConversationService>> = match &config.google_api_key {
        Some(api_key) => {
            info!("Configuring chat model {} at {}", config.chat_model, config.gemini_api_base);
            Some(Arc::new(GeminiChatAdapter::from_credential(
                api_key,
                &config.gemini_api_base,
                config.chat_model.clone(),
                config.chat_streaming,
            )))
        }
        None => {
            warn!("GOOGLE_API_KEY is not set. {}", SETUP_NOTICE);
            None
        }
    };

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(config.clone(), chat_service));

    // --- 4. Create the Web Router ---
    let cors_origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid CORS origin '{}': {}", config.cors_origin, e))
    })?;
    let app = web::router(app_state, cors_origin);

    // --- 5. Start the Server ---
    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received.");
            }
            shutdown.cancel();
        }
    });

    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Server stopped.");
    Ok(())
}
