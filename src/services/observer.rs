//! Lifecycle hook for `TweetSync` operations.

use crate::error::SyncError;

/// The operations exposed by [`super::sync::TweetSync`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchBatch,
    FetchLatest,
    ListStored,
    CountStored,
    SetOrGetFetchedAt,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::FetchBatch => "fetch_batch",
            Operation::FetchLatest => "fetch_latest",
            Operation::ListStored => "list_stored",
            Operation::CountStored => "count_stored",
            Operation::SetOrGetFetchedAt => "set_or_get_fetched_at",
        }
    }
}

/// Called at request start, success and failure of every operation.
///
/// `items` is the number of tweets returned (1 for scalar results, 0 for an
/// empty `fetch_latest`).
pub trait SyncObserver: Send + Sync {
    fn request_started(&self, _op: Operation) {}

    fn request_succeeded(&self, _op: Operation, _items: usize) {}

    fn request_failed(&self, _op: Operation, _error: &SyncError) {}
}

/// Default observer: one structured event per lifecycle point.
pub struct TracingObserver;

impl SyncObserver for TracingObserver {
    fn request_started(&self, op: Operation) {
        tracing::debug!(op = op.as_str(), "Sync request started");
    }

    fn request_succeeded(&self, op: Operation, items: usize) {
        tracing::info!(op = op.as_str(), items, "Sync request succeeded");
    }

    fn request_failed(&self, op: Operation, error: &SyncError) {
        tracing::warn!(op = op.as_str(), kind = error.kind(), %error, "Sync request failed");
    }
}

pub struct NoopObserver;

impl SyncObserver for NoopObserver {}
