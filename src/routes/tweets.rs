//! Tweet endpoints (/tweets/*)

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::AppState;
use crate::constants::DEFAULT_FETCH_LIMIT;
use crate::domain::Tweet;
use crate::services::error::LogErr;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tweets", get(list_tweets))
        .route("/tweets/count", get(count_tweets))
        .route("/tweets/fetch", post(fetch_tweets))
        .route("/tweets/fetch/latest", post(fetch_latest_tweet))
}

/// GET /tweets - Stored tweets, newest first
async fn list_tweets(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Tweet>>, StatusCode> {
    let tweets = state.sync.list_stored().await.log_status("List tweets error")?;
    Ok(Json(tweets))
}

#[derive(Serialize)]
struct CountResponse {
    count: i64,
}

/// GET /tweets/count
async fn count_tweets(State(state): State<Arc<AppState>>) -> Result<Json<CountResponse>, StatusCode> {
    let count = state.sync.count_stored().await.log_status("Count tweets error")?;
    Ok(Json(CountResponse { count }))
}

#[derive(Deserialize)]
struct FetchQuery {
    limit: Option<u32>,
}

/// POST /tweets/fetch?limit=n - Pull recent tweets from X and store new ones
async fn fetch_tweets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FetchQuery>,
) -> Result<Json<Vec<Tweet>>, StatusCode> {
    let limit = query.limit.unwrap_or(DEFAULT_FETCH_LIMIT);
    if limit == 0 {
        return Err(StatusCode::BAD_REQUEST);
    }

    let tweets = state.sync.fetch_batch(limit).await.log_status("Fetch tweets error")?;
    Ok(Json(tweets))
}

/// POST /tweets/fetch/latest - `null` when the account has no tweets
async fn fetch_latest_tweet(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Option<Tweet>>, StatusCode> {
    let tweet = state
        .sync
        .fetch_latest()
        .await
        .log_status("Fetch latest tweet error")?;
    Ok(Json(tweet))
}
