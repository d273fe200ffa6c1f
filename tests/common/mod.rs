//! Test doubles shared by the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::bail;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;

use tweet_sync::config::{Credentials, TwitterConfig};
use tweet_sync::domain::{FetchLog, MemoryTweetStore, Tweet, TweetStore};
use tweet_sync::services::observer::{Operation, SyncObserver};
use tweet_sync::twitter::{ApiTweet, TweetSource, TwitterError};
use tweet_sync::{SyncError, TweetSync};

/// What the fake API answers with
#[derive(Clone)]
pub enum FakeResponse {
    Tweets(Vec<serde_json::Value>),
    Status(u16),
}

/// Records every call and answers with a configurable response
pub struct FakeSource {
    calls: AtomicUsize,
    max_results: Mutex<Vec<u32>>,
    response: Mutex<FakeResponse>,
}

impl FakeSource {
    pub fn new(response: FakeResponse) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            max_results: Mutex::new(Vec::new()),
            response: Mutex::new(response),
        })
    }

    pub fn with_tweets(tweets: Vec<serde_json::Value>) -> Arc<Self> {
        Self::new(FakeResponse::Tweets(tweets))
    }

    pub fn respond_with(&self, response: FakeResponse) {
        *self.response.lock().unwrap() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_results(&self) -> Vec<u32> {
        self.max_results.lock().unwrap().clone()
    }
}

#[async_trait]
impl TweetSource for FakeSource {
    async fn user_tweets(
        &self,
        _credentials: Credentials<'_>,
        max_results: u32,
    ) -> Result<Vec<ApiTweet>, TwitterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.max_results.lock().unwrap().push(max_results);

        let response = self.response.lock().unwrap().clone();
        match response {
            FakeResponse::Tweets(tweets) => Ok(tweets
                .into_iter()
                .take(max_results as usize)
                .map(|t| serde_json::from_value(t).unwrap())
                .collect()),
            FakeResponse::Status(status) => Err(TwitterError::Api {
                status,
                message: r#"{"title":"Unauthorized"}"#.to_string(),
            }),
        }
    }
}

/// Records lifecycle events as strings like `"start:fetch_batch"`
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl SyncObserver for RecordingObserver {
    fn request_started(&self, op: Operation) {
        self.events.lock().unwrap().push(format!("start:{}", op.as_str()));
    }

    fn request_succeeded(&self, op: Operation, items: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("ok:{}:{}", op.as_str(), items));
    }

    fn request_failed(&self, op: Operation, error: &SyncError) {
        self.events
            .lock()
            .unwrap()
            .push(format!("err:{}:{}", op.as_str(), error.kind()));
    }
}

/// Wraps [`MemoryTweetStore`], counting tweet writes and injecting failures
#[derive(Default)]
pub struct FaultyStore {
    inner: MemoryTweetStore,
    tweet_writes: AtomicUsize,
    fail_inserts_for: Mutex<Vec<String>>,
    unavailable: AtomicBool,
}

impl FaultyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of tweet rows actually written.
    pub fn tweet_writes(&self) -> usize {
        self.tweet_writes.load(Ordering::SeqCst)
    }

    /// Make inserts of the given tweet id fail.
    pub fn fail_inserts_for(&self, id: &str) {
        self.fail_inserts_for.lock().unwrap().push(id.to_string());
    }

    /// Make every operation fail, as if the database were unreachable.
    pub fn fail_all(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            bail!("store unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl TweetStore for FaultyStore {
    async fn find_tweet(&self, id: &str) -> anyhow::Result<Option<Tweet>> {
        self.check()?;
        self.inner.find_tweet(id).await
    }

    async fn insert_tweet_if_absent(&self, tweet: &Tweet) -> anyhow::Result<bool> {
        self.check()?;
        if self.fail_inserts_for.lock().unwrap().contains(&tweet.id) {
            bail!("insert rejected for tweet {}", tweet.id);
        }
        let written = self.inner.insert_tweet_if_absent(tweet).await?;
        if written {
            self.tweet_writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(written)
    }

    async fn list_tweets(&self) -> anyhow::Result<Vec<Tweet>> {
        self.check()?;
        self.inner.list_tweets().await
    }

    async fn count_tweets(&self) -> anyhow::Result<i64> {
        self.check()?;
        self.inner.count_tweets().await
    }

    async fn find_fetch_log(&self, kind: &str) -> anyhow::Result<Option<FetchLog>> {
        self.check()?;
        self.inner.find_fetch_log(kind).await
    }

    async fn upsert_fetch_log(
        &self,
        kind: &str,
        fetched_at: DateTime<Utc>,
    ) -> anyhow::Result<FetchLog> {
        self.check()?;
        self.inner.upsert_fetch_log(kind, fetched_at).await
    }

    async fn insert_fetch_log_if_absent(
        &self,
        kind: &str,
        fetched_at: DateTime<Utc>,
    ) -> anyhow::Result<FetchLog> {
        self.check()?;
        self.inner.insert_fetch_log_if_absent(kind, fetched_at).await
    }
}

pub fn api_tweet(id: &str, created_at: &str, likes: i64) -> serde_json::Value {
    json!({
        "id": id,
        "text": format!("tweet {id}"),
        "created_at": created_at,
        "public_metrics": {
            "retweet_count": 0,
            "reply_count": 1,
            "like_count": likes,
            "quote_count": 0
        },
        "conversation_id": id,
        "edit_history_tweet_ids": [id]
    })
}

pub fn full_config() -> TwitterConfig {
    TwitterConfig::new(Some("test-bearer".into()), Some("1234".into()))
}

pub struct Harness {
    pub sync: TweetSync,
    pub source: Arc<FakeSource>,
    pub store: Arc<FaultyStore>,
}

pub fn harness(config: TwitterConfig, source: Arc<FakeSource>) -> Harness {
    let store = FaultyStore::new();
    let sync = TweetSync::new(config, source.clone(), store.clone());
    Harness {
        sync,
        source,
        store,
    }
}
