//! API Routes
//!
//! Configures the Axum router with all bridge endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cancel_handler, delete_handler, favourite_handler, get_handler, health_handler,
    list_handler, mute_handler, poll_handler, search_handler, stats_handler, toot_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /toots` - List cached statuses
/// - `POST /toots` - Toot or reply
/// - `GET /toots/:key` - Show a cached status
/// - `DELETE /toots/:key` - Delete a status
/// - `POST /toots/:key/favourite` - Toggle the favourite flag
/// - `POST /search` - Search and cache the first match
/// - `POST /mute` - Mute a conversation
/// - `POST /cancel` - Cancel deferred posts
/// - `POST /notifications/poll` - Poll for mentions now
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// Keys are base64 and may contain `/` or `+`, so `:key` must be
/// percent-encoded. Responses carry a ready-made `href` for each status.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/toots", get(list_handler).post(toot_handler))
        .route("/toots/:key", get(get_handler).delete(delete_handler))
        .route("/toots/:key/favourite", post(favourite_handler))
        .route("/search", post(search_handler))
        .route("/mute", post(mute_handler))
        .route("/cancel", post(cancel_handler))
        .route("/notifications/poll", post(poll_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
