use sqlx::SqlitePool;

use crate::error::DbError;

/// Migration definition contributed by a module
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

const CREATE_LEDGER: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (module, id)
    )
"#;

/// Apply `(module, migration)` pairs in the given order, skipping those
/// already recorded in the `_migrations` ledger.
pub(crate) async fn apply(
    pool: &SqlitePool,
    migrations: &[(String, Migration)],
) -> Result<usize, DbError> {
    sqlx::query(CREATE_LEDGER).execute(pool).await?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let seen: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM _migrations WHERE module = ? AND id = ?")
                .bind(module)
                .bind(migration.id)
                .fetch_one(pool)
                .await?;
        if seen > 0 {
            tracing::debug!(module = %module, id = migration.id, "migration already applied");
            continue;
        }

        let failed = |source| DbError::Migration {
            module: module.clone(),
            id: migration.id.to_string(),
            source,
        };

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;
        sqlx::query("INSERT INTO _migrations (module, id) VALUES (?, ?)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;
        tx.commit().await?;

        tracing::info!(module = %module, id = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    fn widgets() -> Vec<(String, Migration)> {
        vec![(
            "widgets".to_string(),
            Migration {
                id: "001_init",
                up: r#"
                    CREATE TABLE widget (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
                    CREATE INDEX widget_name_idx ON widget(name);
                "#,
            },
        )]
    }

    #[tokio::test]
    async fn applies_pending_migrations_once() {
        let db = Database::in_memory().await.unwrap();

        assert_eq!(db.run_migrations(&widgets()).await.unwrap(), 1);
        assert_eq!(db.run_migrations(&widgets()).await.unwrap(), 0);

        let recorded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _migrations")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(recorded, 1);
    }

    #[tokio::test]
    async fn failed_migration_is_not_recorded() {
        let db = Database::in_memory().await.unwrap();
        let broken = vec![(
            "broken".to_string(),
            Migration {
                id: "001_init",
                up: "CREATE TABLE oops (",
            },
        )];

        let err = db.run_migrations(&broken).await.unwrap_err();
        assert!(matches!(err, DbError::Migration { ref module, .. } if module == "broken"));

        let recorded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _migrations")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(recorded, 0);
    }
}
