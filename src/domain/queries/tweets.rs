//! Tweet domain - DB queries for the `tweets` table
//!
//! All functions use the generic Executor pattern, allowing them to work with
//! both `&PgPool` (for standalone queries) and `&mut PgConnection` (for transactions).

use sqlx::{Executor, Postgres};

use crate::domain::models::{Tweet, TweetRow};

/// Find a stored tweet by its X id
pub async fn find_tweet<'e, E>(executor: E, id: &str) -> Result<Option<TweetRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT id, text, created_at, retweet_count, reply_count, like_count,
               quote_count, conversation_id, in_reply_to_user_id
        FROM tweets
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Insert a tweet unless its id is already stored.
/// Returns false when the row already existed (including a concurrent insert).
pub async fn insert_tweet_if_absent<'e, E>(executor: E, tweet: &Tweet) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO tweets (id, text, created_at, retweet_count, reply_count, like_count,
                            quote_count, conversation_id, in_reply_to_user_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(&tweet.id)
    .bind(&tweet.text)
    .bind(tweet.created_at)
    .bind(tweet.public_metrics.retweet_count)
    .bind(tweet.public_metrics.reply_count)
    .bind(tweet.public_metrics.like_count)
    .bind(tweet.public_metrics.quote_count)
    .bind(&tweet.conversation_id)
    .bind(&tweet.in_reply_to_user_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// List every stored tweet, newest first
pub async fn list_tweets<'e, E>(executor: E) -> Result<Vec<TweetRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT id, text, created_at, retweet_count, reply_count, like_count,
               quote_count, conversation_id, in_reply_to_user_id
        FROM tweets
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn count_tweets<'e, E>(executor: E) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tweets")
        .fetch_one(executor)
        .await?;

    Ok(count)
}
