//! Postgres queries, one module per table

pub mod fetch_log;
pub mod tweets;
