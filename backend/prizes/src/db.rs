//! Database layer — connection pool and migrations.

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::info;

use crate::errors::Result;

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    // Create the database file on first start.
    let options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

/// Apply the embedded migrations from `./migrations`.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied successfully");
    Ok(())
}

/// Fresh migrated in-memory database. A single never-recycled connection
/// keeps every query on the same database.
#[cfg(test)]
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");
    migrate(&pool).await.expect("run migrations");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_create_proposals_table() {
        let pool = memory_pool().await;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM prize_proposals")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn status_check_constraint_rejects_unknown_states() {
        let pool = memory_pool().await;
        let res = sqlx::query(
            r#"
            INSERT INTO prize_proposals
                (id, user_id, title, description, is_automatic,
                 submission_time, voting_time, status, created_at)
            VALUES ('p1', 'u1', 't', 'd', 0, 1, 1, 'rejected', 0)
            "#,
        )
        .execute(&pool)
        .await;
        assert!(res.is_err());
    }
}
