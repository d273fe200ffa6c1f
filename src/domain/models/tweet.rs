//! Tweet model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Engagement counters as reported by the X API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicMetrics {
    pub retweet_count: i64,
    pub reply_count: i64,
    pub like_count: i64,
    pub quote_count: i64,
}

impl PublicMetrics {
    pub fn is_non_negative(&self) -> bool {
        self.retweet_count >= 0
            && self.reply_count >= 0
            && self.like_count >= 0
            && self.quote_count >= 0
    }
}

/// A tweet as fetched from the API and as returned to callers.
///
/// Once stored, a tweet is never rewritten: later fetches of the same `id`
/// leave the first-seen text and metrics in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub public_metrics: PublicMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to_user_id: Option<String>,
}

/// Flat `tweets` table row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TweetRow {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub retweet_count: i64,
    pub reply_count: i64,
    pub like_count: i64,
    pub quote_count: i64,
    pub conversation_id: Option<String>,
    pub in_reply_to_user_id: Option<String>,
}

impl From<TweetRow> for Tweet {
    fn from(row: TweetRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            created_at: row.created_at,
            public_metrics: PublicMetrics {
                retweet_count: row.retweet_count,
                reply_count: row.reply_count,
                like_count: row.like_count,
                quote_count: row.quote_count,
            },
            // Empty strings were never meaningful ids
            conversation_id: row.conversation_id.filter(|s| !s.is_empty()),
            in_reply_to_user_id: row.in_reply_to_user_id.filter(|s| !s.is_empty()),
        }
    }
}
