//! Storage port for tweets and the fetch log.
//!
//! `TweetSync` only talks to storage through [`TweetStore`], so the Postgres
//! implementation can be swapped for [`MemoryTweetStore`] in tests.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::models::{FetchLog, Tweet};
use super::queries::{fetch_log, tweets};

#[async_trait]
pub trait TweetStore: Send + Sync {
    async fn find_tweet(&self, id: &str) -> Result<Option<Tweet>>;

    /// Returns true when a new row was written.
    async fn insert_tweet_if_absent(&self, tweet: &Tweet) -> Result<bool>;

    /// All tweets, newest `created_at` first.
    async fn list_tweets(&self) -> Result<Vec<Tweet>>;

    async fn count_tweets(&self) -> Result<i64>;

    async fn find_fetch_log(&self, kind: &str) -> Result<Option<FetchLog>>;

    async fn upsert_fetch_log(&self, kind: &str, fetched_at: DateTime<Utc>) -> Result<FetchLog>;

    /// Returns the existing row if there is one, otherwise the row just created.
    async fn insert_fetch_log_if_absent(
        &self,
        kind: &str,
        fetched_at: DateTime<Utc>,
    ) -> Result<FetchLog>;
}

/// Postgres-backed store
#[derive(Clone)]
pub struct PgTweetStore {
    pool: PgPool,
}

impl PgTweetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded SQL migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl TweetStore for PgTweetStore {
    async fn find_tweet(&self, id: &str) -> Result<Option<Tweet>> {
        let row = tweets::find_tweet(&self.pool, id).await?;
        Ok(row.map(Tweet::from))
    }

    async fn insert_tweet_if_absent(&self, tweet: &Tweet) -> Result<bool> {
        Ok(tweets::insert_tweet_if_absent(&self.pool, tweet).await?)
    }

    async fn list_tweets(&self) -> Result<Vec<Tweet>> {
        let rows = tweets::list_tweets(&self.pool).await?;
        Ok(rows.into_iter().map(Tweet::from).collect())
    }

    async fn count_tweets(&self) -> Result<i64> {
        Ok(tweets::count_tweets(&self.pool).await?)
    }

    async fn find_fetch_log(&self, kind: &str) -> Result<Option<FetchLog>> {
        Ok(fetch_log::find_fetch_log(&self.pool, kind).await?)
    }

    async fn upsert_fetch_log(&self, kind: &str, fetched_at: DateTime<Utc>) -> Result<FetchLog> {
        Ok(fetch_log::upsert_fetch_log(&self.pool, kind, fetched_at).await?)
    }

    async fn insert_fetch_log_if_absent(
        &self,
        kind: &str,
        fetched_at: DateTime<Utc>,
    ) -> Result<FetchLog> {
        Ok(fetch_log::insert_fetch_log_if_absent(&self.pool, kind, fetched_at).await?)
    }
}

/// In-memory store for tests and local runs without a database.
#[derive(Default)]
pub struct MemoryTweetStore {
    inner: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    tweets: HashMap<String, Tweet>,
    fetch_log: HashMap<String, DateTime<Utc>>,
}

impl MemoryTweetStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

#[async_trait]
impl TweetStore for MemoryTweetStore {
    async fn find_tweet(&self, id: &str) -> Result<Option<Tweet>> {
        Ok(self.state()?.tweets.get(id).cloned())
    }

    async fn insert_tweet_if_absent(&self, tweet: &Tweet) -> Result<bool> {
        let mut state = self.state()?;
        if state.tweets.contains_key(&tweet.id) {
            return Ok(false);
        }
        state.tweets.insert(tweet.id.clone(), tweet.clone());
        Ok(true)
    }

    async fn list_tweets(&self) -> Result<Vec<Tweet>> {
        let mut tweets: Vec<Tweet> = self.state()?.tweets.values().cloned().collect();
        tweets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(tweets)
    }

    async fn count_tweets(&self) -> Result<i64> {
        Ok(self.state()?.tweets.len() as i64)
    }

    async fn find_fetch_log(&self, kind: &str) -> Result<Option<FetchLog>> {
        Ok(self.state()?.fetch_log.get(kind).map(|fetched_at| FetchLog {
            kind: kind.to_string(),
            fetched_at: *fetched_at,
        }))
    }

    async fn upsert_fetch_log(&self, kind: &str, fetched_at: DateTime<Utc>) -> Result<FetchLog> {
        self.state()?.fetch_log.insert(kind.to_string(), fetched_at);
        Ok(FetchLog {
            kind: kind.to_string(),
            fetched_at,
        })
    }

    async fn insert_fetch_log_if_absent(
        &self,
        kind: &str,
        fetched_at: DateTime<Utc>,
    ) -> Result<FetchLog> {
        let mut state = self.state()?;
        let stored = *state.fetch_log.entry(kind.to_string()).or_insert(fetched_at);
        Ok(FetchLog {
            kind: kind.to_string(),
            fetched_at: stored,
        })
    }
}
