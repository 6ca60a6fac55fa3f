//! API Handlers
//!
//! HTTP request handlers, one per bridge command plus cache inspection.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::cache::ShortKey;
use crate::error::{BridgeError, Result};
use crate::models::{
    CancelResponse, DeleteResponse, FavouriteResponse, HealthResponse, ListResponse,
    MuteRequest, MuteResponse, PollResponse, SearchRequest, SearchResponse, StatsResponse,
    StatusResponse, TootRequest, TootResponse,
};
use crate::session::Session;
use crate::tasks::PostOutcome;

/// Application state shared across all handlers.
pub type AppState = Session;

/// Handler for GET /toots
///
/// Lists cached statuses, oldest first.
pub async fn list_handler(State(state): State<AppState>) -> Json<ListResponse> {
    let cache = state.cache.read().await;
    let toots = cache
        .keys()
        .iter()
        .filter_map(|key| cache.entry(key).map(|entry| StatusResponse::new(key, entry)))
        .collect();

    Json(ListResponse {
        capacity: cache.capacity(),
        toots,
    })
}

/// Handler for GET /toots/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<StatusResponse>> {
    let key = ShortKey::from(key);
    let cache = state.cache.read().await;
    let entry = cache
        .entry(&key)
        .ok_or_else(|| BridgeError::KeyNotFound(key.to_string()))?;

    Ok(Json(StatusResponse::new(&key, entry)))
}

/// Handler for POST /toots
///
/// Responds 201 once posted, 202 while the post is deferred.
pub async fn toot_handler(
    State(state): State<AppState>,
    Json(req): Json<TootRequest>,
) -> Result<(StatusCode, Json<TootResponse>)> {
    let outcome = state.toot(req).await?;
    let code = match outcome {
        PostOutcome::Posted { .. } => StatusCode::CREATED,
        PostOutcome::Deferred { .. } => StatusCode::ACCEPTED,
    };

    Ok((code, Json(TootResponse::new(&outcome, state.prefix()))))
}

/// Handler for DELETE /toots/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let key = ShortKey::from(key);
    state.delete_toot(&key).await?;

    Ok(Json(DeleteResponse::new(&key, state.prefix())))
}

/// Handler for POST /toots/:key/favourite
pub async fn favourite_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<FavouriteResponse>> {
    let outcome = state.toggle_favourite(&ShortKey::from(key)).await?;

    Ok(Json(FavouriteResponse::new(&outcome, state.prefix())))
}

/// Handler for POST /search
pub async fn search_handler(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(BridgeError::InvalidInput(error_msg));
    }

    let located = state.search(&req.query, req.channel.as_deref()).await?;
    Ok(Json(SearchResponse::new(&located, state.prefix())))
}

/// Handler for POST /mute
pub async fn mute_handler(
    State(state): State<AppState>,
    Json(req): Json<MuteRequest>,
) -> Result<Json<MuteResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(BridgeError::InvalidInput(error_msg));
    }

    let outcome = state.mute(&req.target).await?;
    Ok(Json(MuteResponse::new(&outcome, state.prefix())))
}

/// Handler for POST /cancel
pub async fn cancel_handler(State(state): State<AppState>) -> Json<CancelResponse> {
    let cancelled = state.cancel_pending();
    Json(CancelResponse::new(cancelled, state.prefix()))
}

/// Handler for POST /notifications/poll
///
/// Runs one notification poll right away.
pub async fn poll_handler(State(state): State<AppState>) -> Result<Json<PollResponse>> {
    let announced = state.notification_poller().tick().await?;
    Ok(Json(PollResponse { announced }))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;

    Json(StatsResponse::new(
        cache.stats(),
        cache.capacity(),
        state.poster.pending(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
