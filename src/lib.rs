//! Fetches an account's tweets from the X API and keeps them in Postgres,
//! along with a per-feed record of when each feed was last polled.

pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod poller;
pub mod routes;
pub mod services;
pub mod twitter;

use std::sync::Arc;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::{Result, SyncError};
pub use services::sync::TweetSync;

pub struct AppState {
    pub sync: Arc<TweetSync>,
}

/// Full HTTP application with middleware
pub fn app(state: Arc<AppState>) -> Router {
    routes::build_routes()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
