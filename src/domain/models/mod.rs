//! Domain models

mod fetch_log;
mod tweet;

pub use fetch_log::{FetchLog, default_fetched_at};
pub use tweet::{PublicMetrics, Tweet, TweetRow};
