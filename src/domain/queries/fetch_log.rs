//! Fetch-log domain - DB queries for the `tweet_fetch_log` table

use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};

use crate::domain::models::FetchLog;

pub async fn find_fetch_log<'e, E>(executor: E, kind: &str) -> Result<Option<FetchLog>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT type, fetched_at FROM tweet_fetch_log
        WHERE type = $1
        "#,
    )
    .bind(kind)
    .fetch_optional(executor)
    .await
}

/// Create or overwrite the row for `kind`
pub async fn upsert_fetch_log<'e, E>(
    executor: E,
    kind: &str,
    fetched_at: DateTime<Utc>,
) -> Result<FetchLog, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        INSERT INTO tweet_fetch_log (type, fetched_at)
        VALUES ($1, $2)
        ON CONFLICT (type) DO UPDATE SET fetched_at = EXCLUDED.fetched_at
        RETURNING type, fetched_at
        "#,
    )
    .bind(kind)
    .bind(fetched_at)
    .fetch_one(executor)
    .await
}

/// Create the row for `kind` unless one exists; returns whichever row is stored.
/// The no-op update lets RETURNING yield the existing row on conflict.
pub async fn insert_fetch_log_if_absent<'e, E>(
    executor: E,
    kind: &str,
    fetched_at: DateTime<Utc>,
) -> Result<FetchLog, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        INSERT INTO tweet_fetch_log (type, fetched_at)
        VALUES ($1, $2)
        ON CONFLICT (type) DO UPDATE SET type = tweet_fetch_log.type
        RETURNING type, fetched_at
        "#,
    )
    .bind(kind)
    .bind(fetched_at)
    .fetch_one(executor)
    .await
}
