//! SQLite connection pool and migration tooling for the bookstore service.

use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

pub mod error;
pub mod migration;

pub use error::DbError;
pub use migration::Migration;

/// Shared handle to the relational store.
///
/// Cloning is cheap: the underlying pool is reference counted, so every
/// request handler can hold its own copy.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `url` with a bounded pool.
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        tracing::info!(target: "bookstore-db", %url, max_connections, "opening SQLite pool");

        let mut options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid database url '{url}'"))?
            .create_if_missing(true)
            .foreign_keys(true);

        if !url.contains(":memory:") {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .with_context(|| format!("failed to connect to SQLite database at '{url}'"))?;

        Ok(Self { pool })
    }

    /// Private in-memory database, used by tests and throwaway runs.
    ///
    /// An in-memory SQLite database lives only as long as its connection, so
    /// the pool is pinned to a single connection that never expires.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("invalid in-memory database url")?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("failed to open in-memory SQLite database")?;

        Ok(Self { pool })
    }

    /// Borrow the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Round-trip a trivial query to check connectivity.
    pub async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Apply every migration that has not been recorded yet.
    ///
    /// Returns the number of migrations applied by this call.
    pub async fn run_migrations(
        &self,
        migrations: &[(String, Migration)],
    ) -> Result<usize, DbError> {
        migration::apply(&self.pool, migrations).await
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_database_answers_ping() {
        let db = Database::in_memory().await.unwrap();
        db.ping().await.unwrap();
    }

    #[tokio::test]
    async fn in_memory_database_keeps_state_between_queries() {
        let db = Database::in_memory().await.unwrap();
        sqlx::query("CREATE TABLE t (v INTEGER)")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("INSERT INTO t (v) VALUES (7)")
            .execute(db.pool())
            .await
            .unwrap();

        let v: i64 = sqlx::query_scalar("SELECT v FROM t")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(v, 7);
    }
}
