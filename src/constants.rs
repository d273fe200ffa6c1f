//! Application constants

/// Base URL of the X API v2
pub const DEFAULT_API_BASE: &str = "https://api.x.com/2";

/// Fields requested for every tweet lookup
pub const TWEET_FIELDS: &str = "created_at,public_metrics,conversation_id,in_reply_to_user_id";

/// Default number of tweets requested by a batch fetch
pub const DEFAULT_FETCH_LIMIT: u32 = 20;

/// Fetch-log timestamp used when a feed type has never been recorded
pub const DEFAULT_FETCHED_AT: &str = "2025-02-27T21:30:00Z";

/// Fetch-log key written by the scheduled poller
pub const POLL_FETCH_LOG_KIND: &str = "tweets";

/// Default HTTP timeout for X API requests (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
