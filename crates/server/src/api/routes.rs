use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::middleware::{auth_middleware, metrics_middleware};
use super::{handlers, staff, submissions};
use crate::state::AppState;

/// Room for the text fields and multipart framing on top of the attachment.
const FORM_OVERHEAD_BYTES: u64 = 1024 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = usize::try_from(
        state
            .attachments()
            .max_bytes()
            .saturating_add(FORM_OVERHEAD_BYTES),
    )
    .unwrap_or(usize::MAX);

    // Staff portal (password-gated)
    let staff_routes = Router::new()
        .route("/session", get(staff::session))
        .route("/tickets", get(staff::list_tickets))
        .route("/tickets/export", get(staff::export_tickets))
        .route("/attachments/{name}", get(staff::download_attachment))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Public intake
        .route(
            "/tickets",
            post(submissions::submit_ticket).layer(DefaultBodyLimit::max(body_limit)),
        )
        .nest("/staff", staff_routes)
        .with_state(state.clone());

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
