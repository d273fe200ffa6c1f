//! Fetch-log endpoints (/fetch-log/{type})

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::AppState;
use crate::services::error::LogErr;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/fetch-log/{kind}", get(get_fetched_at).put(set_fetched_at))
}

#[derive(Serialize)]
struct FetchLogResponse {
    #[serde(rename = "type")]
    kind: String,
    fetched_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct SetFetchedAtRequest {
    fetched_at: DateTime<Utc>,
}

/// GET /fetch-log/{type} - Recorded fetch time, initialised on first read
async fn get_fetched_at(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<FetchLogResponse>, StatusCode> {
    let fetched_at = state
        .sync
        .set_or_get_fetched_at(&kind, None)
        .await
        .log_status("Get fetched_at error")?;
    Ok(Json(FetchLogResponse { kind, fetched_at }))
}

/// PUT /fetch-log/{type} - Record a fetch time
async fn set_fetched_at(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Json(req): Json<SetFetchedAtRequest>,
) -> Result<Json<FetchLogResponse>, StatusCode> {
    let fetched_at = state
        .sync
        .set_or_get_fetched_at(&kind, Some(req.fetched_at))
        .await
        .log_status("Set fetched_at error")?;
    Ok(Json(FetchLogResponse { kind, fetched_at }))
}
