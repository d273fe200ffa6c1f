//! Fetch tweets from the X API and keep them in storage.
//!
//! Every operation runs its round-trips sequentially. Storage and transport
//! failures are logged with their cause and surfaced as a short [`SyncError`].

use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::config::{Credentials, PersistPolicy, SyncConfig, TwitterConfig};
use crate::constants::DEFAULT_FETCH_LIMIT;
use crate::domain::{Tweet, TweetStore, default_fetched_at};
use crate::error::{Result, SyncError};
use crate::services::observer::{Operation, SyncObserver, TracingObserver};
use crate::twitter::TweetSource;

pub struct TweetSync {
    twitter: TwitterConfig,
    source: Arc<dyn TweetSource>,
    store: Arc<dyn TweetStore>,
    observer: Arc<dyn SyncObserver>,
    config: SyncConfig,
}

impl TweetSync {
    pub fn new(
        twitter: TwitterConfig,
        source: Arc<dyn TweetSource>,
        store: Arc<dyn TweetStore>,
    ) -> Self {
        Self {
            twitter,
            source,
            store,
            observer: Arc::new(TracingObserver),
            config: SyncConfig::default(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn SyncObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Fetch up to `limit` recent tweets, store the ones not seen before and
    /// return all of them.
    pub async fn fetch_batch(&self, limit: u32) -> Result<Vec<Tweet>> {
        self.observer.request_started(Operation::FetchBatch);
        let result = self.fetch_batch_inner(limit).await;
        self.finish(Operation::FetchBatch, result, Vec::len)
    }

    /// [`Self::fetch_batch`] with the default limit of 20.
    pub async fn fetch_default_batch(&self) -> Result<Vec<Tweet>> {
        self.fetch_batch(DEFAULT_FETCH_LIMIT).await
    }

    /// Fetch and store the single most recent tweet, if the account has one.
    pub async fn fetch_latest(&self) -> Result<Option<Tweet>> {
        self.observer.request_started(Operation::FetchLatest);
        let result = self.fetch_latest_inner().await;
        self.finish(Operation::FetchLatest, result, |t| usize::from(t.is_some()))
    }

    /// Stored tweets, newest first.
    pub async fn list_stored(&self) -> Result<Vec<Tweet>> {
        self.observer.request_started(Operation::ListStored);
        let result = self.store.list_tweets().await.map_err(|e| {
            tracing::error!(error = ?e, "Error fetching tweets from DB");
            SyncError::Read("Failed to fetch tweets from DB".to_string())
        });
        self.finish(Operation::ListStored, result, Vec::len)
    }

    pub async fn count_stored(&self) -> Result<i64> {
        self.observer.request_started(Operation::CountStored);
        let result = self.store.count_tweets().await.map_err(|e| {
            tracing::error!(error = ?e, "Error getting total tweet count");
            SyncError::Read("Failed to get total tweet count".to_string())
        });
        self.finish(Operation::CountStored, result, |_| 1)
    }

    /// With `date`, record it as the last fetch time of `kind`. Without,
    /// return the recorded time, initialising it to `2025-02-27T21:30:00Z`
    /// on first use.
    pub async fn set_or_get_fetched_at(
        &self,
        kind: &str,
        date: Option<DateTime<Utc>>,
    ) -> Result<DateTime<Utc>> {
        self.observer.request_started(Operation::SetOrGetFetchedAt);
        let result = self.set_or_get_inner(kind, date).await.map_err(|e| {
            tracing::error!(kind, error = ?e, "Error updating fetched_at");
            SyncError::Update("Failed to update fetched_at".to_string())
        });
        self.finish(Operation::SetOrGetFetchedAt, result, |_| 1)
    }

    async fn fetch_batch_inner(&self, limit: u32) -> Result<Vec<Tweet>> {
        let credentials = self.twitter.credentials()?;
        if limit == 0 {
            return Err(SyncError::Fetch("Fetch limit must be positive".to_string()));
        }

        let tweets = self.request(credentials, limit).await.map_err(|e| {
            tracing::error!(limit, error = ?e, "Error fetching tweets");
            SyncError::Fetch("Failed to fetch tweets".to_string())
        })?;

        if tweets.is_empty() {
            return Ok(tweets);
        }

        self.persist_all(&tweets).await.map_err(|e| {
            tracing::error!(error = ?e, "Error storing fetched tweets");
            SyncError::Fetch("Failed to fetch tweets".to_string())
        })?;

        Ok(tweets)
    }

    async fn fetch_latest_inner(&self) -> Result<Option<Tweet>> {
        let credentials = self.twitter.credentials()?;

        self.fetch_latest_and_store(credentials).await.map_err(|e| {
            tracing::error!(error = ?e, "Error fetching the latest tweet");
            SyncError::Fetch("Failed to fetch the latest tweet".to_string())
        })
    }

    async fn fetch_latest_and_store(
        &self,
        credentials: Credentials<'_>,
    ) -> anyhow::Result<Option<Tweet>> {
        let Some(tweet) = self.request(credentials, 1).await?.into_iter().next() else {
            return Ok(None);
        };
        self.save_tweet(&tweet).await?;
        Ok(Some(tweet))
    }

    /// One API round-trip, mapped to domain tweets.
    async fn request(&self, credentials: Credentials<'_>, limit: u32) -> anyhow::Result<Vec<Tweet>> {
        let api_tweets = self.source.user_tweets(credentials, limit).await?;
        tracing::debug!(count = api_tweets.len(), "Received tweets");

        let tweets = api_tweets
            .into_iter()
            .map(Tweet::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tweets)
    }

    async fn persist_all(&self, tweets: &[Tweet]) -> anyhow::Result<()> {
        let mut inserted = 0usize;
        for tweet in tweets {
            match self.save_tweet(tweet).await {
                Ok(true) => inserted += 1,
                Ok(false) => {}
                Err(e) if self.config.persist_policy == PersistPolicy::SkipFailed => {
                    tracing::warn!(tweet_id = %tweet.id, error = ?e, "Skipping tweet that failed to store");
                }
                Err(e) => return Err(e),
            }
        }
        tracing::info!(fetched = tweets.len(), inserted, "Stored fetched tweets");
        Ok(())
    }

    /// Existence-checked write. An existing row is never overwritten, so the
    /// first-seen text and metrics win.
    async fn save_tweet(&self, tweet: &Tweet) -> anyhow::Result<bool> {
        if self.store.find_tweet(&tweet.id).await?.is_some() {
            return Ok(false);
        }
        self.store
            .insert_tweet_if_absent(tweet)
            .await
            .with_context(|| format!("inserting tweet {}", tweet.id))
    }

    async fn set_or_get_inner(
        &self,
        kind: &str,
        date: Option<DateTime<Utc>>,
    ) -> anyhow::Result<DateTime<Utc>> {
        if let Some(date) = date {
            tracing::info!(kind, fetched_at = %date.to_rfc3339(), "Updating fetched_at");
            let log = self.store.upsert_fetch_log(kind, date).await?;
            return Ok(log.fetched_at);
        }

        if let Some(existing) = self.store.find_fetch_log(kind).await? {
            tracing::debug!(kind, fetched_at = %existing.fetched_at.to_rfc3339(), "Existing fetched_at");
            return Ok(existing.fetched_at);
        }

        let log = self
            .store
            .insert_fetch_log_if_absent(kind, default_fetched_at()?)
            .await?;
        tracing::info!(kind, fetched_at = %log.fetched_at.to_rfc3339(), "Initialised fetched_at");
        Ok(log.fetched_at)
    }

    fn finish<T>(
        &self,
        op: Operation,
        result: Result<T>,
        items: impl FnOnce(&T) -> usize,
    ) -> Result<T> {
        match &result {
            Ok(value) => self.observer.request_succeeded(op, items(value)),
            Err(error) => self.observer.request_failed(op, error),
        }
        result
    }
}
