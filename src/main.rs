use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use tweet_sync::config::AppConfig;
use tweet_sync::domain::PgTweetStore;
use tweet_sync::twitter::TwitterClient;
use tweet_sync::{AppState, TweetSync, app, poller};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tweet_sync=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let store = PgTweetStore::new(pool);
    store.migrate().await.context("Failed to run migrations")?;

    let twitter = TwitterClient::from_config(&config.twitter)?;

    let sync = Arc::new(
        TweetSync::new(config.twitter.clone(), Arc::new(twitter), Arc::new(store))
            .with_config(config.sync),
    );

    if config.poll.enabled() {
        let poll_sync = sync.clone();
        let poll = config.poll.clone();
        tokio::spawn(async move {
            if let Err(e) = poller::run_poll_worker(poll_sync, poll).await {
                tracing::error!(error = ?e, "Tweet poller stopped");
            }
        });
    }

    let state = Arc::new(AppState { sync });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app(state)).await.context("Server failed")?;
    Ok(())
}
