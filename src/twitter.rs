use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::{Credentials, TwitterConfig};
use crate::constants::TWEET_FIELDS;
use crate::domain::{PublicMetrics, Tweet};

/// Source of an account's recent tweets.
#[async_trait]
pub trait TweetSource: Send + Sync {
    /// Most recent tweets of `credentials.user_id`, retweets excluded.
    /// An account without tweets yields an empty vec.
    async fn user_tweets(
        &self,
        credentials: Credentials<'_>,
        max_results: u32,
    ) -> Result<Vec<ApiTweet>, TwitterError>;
}

/// X API v2 client using app-only bearer auth
#[derive(Clone)]
pub struct TwitterClient {
    api_base: String,
    http: Client,
}

impl TwitterClient {
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, TwitterError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &TwitterConfig) -> Result<Self, TwitterError> {
        Self::new(&config.api_base, Duration::from_secs(config.timeout_secs))
    }

    fn user_tweets_url(&self, user_id: &str) -> String {
        format!("{}/users/{}/tweets", self.api_base, percent_encode(user_id))
    }
}

#[async_trait]
impl TweetSource for TwitterClient {
    async fn user_tweets(
        &self,
        credentials: Credentials<'_>,
        max_results: u32,
    ) -> Result<Vec<ApiTweet>, TwitterError> {
        let url = self.user_tweets_url(credentials.user_id);
        let max_results = max_results.to_string();

        tracing::debug!(%url, max_results = %max_results, "Requesting user tweets");

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("max_results", max_results.as_str()),
                ("tweet.fields", TWEET_FIELDS),
                ("exclude", "retweets"),
            ])
            .header("Authorization", format!("Bearer {}", credentials.bearer_token))
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(TwitterError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let wrapper: UserTweetsResponse = serde_json::from_str(&text).map_err(|e| {
            TwitterError::Shape(format!("Failed to parse response: {} - body: {}", e, text))
        })?;

        Ok(wrapper.data.unwrap_or_default())
    }
}

fn percent_encode(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s, percent_encoding::NON_ALPHANUMERIC).to_string()
}

#[derive(Debug, Deserialize)]
struct UserTweetsResponse {
    #[serde(default)]
    data: Option<Vec<ApiTweet>>,
}

/// A tweet exactly as the X API returns it
#[derive(Debug, Clone, Deserialize)]
pub struct ApiTweet {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub public_metrics: Option<PublicMetrics>,
    pub conversation_id: Option<String>,
    pub in_reply_to_user_id: Option<String>,
}

impl TryFrom<ApiTweet> for Tweet {
    type Error = TwitterError;

    fn try_from(api: ApiTweet) -> Result<Self, Self::Error> {
        let public_metrics = api
            .public_metrics
            .ok_or_else(|| TwitterError::Shape(format!("tweet {} has no public_metrics", api.id)))?;

        if !public_metrics.is_non_negative() {
            return Err(TwitterError::Shape(format!(
                "tweet {} has negative metrics: {:?}",
                api.id, public_metrics
            )));
        }

        Ok(Tweet {
            id: api.id,
            text: api.text,
            created_at: api.created_at,
            public_metrics,
            conversation_id: api.conversation_id,
            in_reply_to_user_id: api.in_reply_to_user_id,
        })
    }
}

#[derive(Debug, Error)]
pub enum TwitterError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Twitter API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Shape(String),
}
