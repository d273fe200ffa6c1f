//! Scheduled tweet polling using apalis
//!
//! Runs as a cron job that fetches a batch of recent tweets and records the
//! poll time in the fetch log. Failed polls are logged and retried on the
//! next tick.

use anyhow::{Context, Result};
use apalis::prelude::*;
use apalis_cron::CronStream;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::PollConfig;
use crate::constants::POLL_FETCH_LOG_KIND;
use crate::services::sync::TweetSync;

/// Job input - the tick that triggered the poll
#[derive(Debug, Clone)]
pub struct PollJob {
    pub scheduled_at: DateTime<Utc>,
}

impl From<DateTime<Utc>> for PollJob {
    fn from(dt: DateTime<Utc>) -> Self {
        PollJob { scheduled_at: dt }
    }
}

/// Shared context for polling
#[derive(Clone)]
pub struct PollContext {
    pub sync: Arc<TweetSync>,
    pub limit: u32,
}

/// Job handler - always returns Ok so the schedule keeps running
async fn poll_tweets(job: PollJob, ctx: Data<PollContext>) -> Result<(), Error> {
    run_poll(&ctx, job.scheduled_at).await;
    Ok(())
}

/// Fetch one batch and, if it succeeded, record `polled_at` in the fetch log.
/// Returns whether the poll succeeded.
pub async fn run_poll(ctx: &PollContext, polled_at: DateTime<Utc>) -> bool {
    let tweets = match ctx.sync.fetch_batch(ctx.limit).await {
        Ok(tweets) => tweets,
        Err(e) => {
            tracing::warn!(error = %e, "Scheduled poll failed");
            return false;
        }
    };

    match ctx
        .sync
        .set_or_get_fetched_at(POLL_FETCH_LOG_KIND, Some(polled_at))
        .await
    {
        Ok(_) => {
            tracing::info!(count = tweets.len(), %polled_at, "Scheduled poll complete");
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "Scheduled poll could not record fetch time");
            false
        }
    }
}

/// Start the poll worker. Returns when the monitor shuts down.
pub async fn run_poll_worker(sync: Arc<TweetSync>, poll: PollConfig) -> Result<()> {
    let schedule = poll.schedule()?.context("POLL_CRON is not set")?;
    let ctx = PollContext {
        sync,
        limit: poll.limit,
    };

    tracing::info!(schedule = ?poll.cron, limit = poll.limit, "Tweet poller starting");

    let worker = WorkerBuilder::new("tweet-poller")
        .data(ctx)
        .backend(CronStream::new(schedule))
        .build_fn(poll_tweets);

    Monitor::new()
        .register(worker)
        .run()
        .await
        .context("Tweet poller monitor failed")?;
    Ok(())
}
