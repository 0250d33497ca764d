pub mod chat;
pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;
pub mod trackers;

use axum::{
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use middleware::{require_session, SESSION_HEADER};
pub use rest::ApiDoc;
pub use state::AppState;

/// Builds the complete application router: API routes plus the Swagger UI.
pub fn router(app_state: Arc<AppState>, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(SESSION_HEADER)]);

    // Routes that need no session
    let public_routes = Router::new()
        .route("/status", get(rest::status_handler))
        .route("/sessions", post(rest::create_session_handler))
        .route("/prompts", get(rest::prompts_handler))
        .route("/emotions", get(trackers::emotions_handler))
        .route("/stress-relief", get(trackers::stress_relief_handler))
        .route("/emotions/check-in", post(trackers::emotion_check_in_handler));

    // Session-scoped routes
    let session_routes = Router::new()
        .route("/session", delete(rest::delete_session_handler))
        .route("/session/reset", post(rest::reset_session_handler))
        .route("/chat", post(chat::chat_handler))
        .route("/chat/history", get(chat::history_handler))
        .route(
            "/mood",
            post(trackers::save_mood_handler).get(trackers::list_moods_handler),
        )
        .route(
            "/stress",
            post(trackers::log_stress_handler).get(trackers::list_stress_handler),
        )
        .route(
            "/journal",
            post(trackers::save_journal_handler).get(trackers::list_journal_handler),
        )
        .route("/breathing", post(trackers::breathing_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_session,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
