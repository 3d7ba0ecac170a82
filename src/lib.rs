//! Bookstore catalog application library
//!
//! Wires the `categories` and `books` modules into the module kernel and
//! exposes the bootstrap steps shared by the server binary and the CLI.

#![recursion_limit = "256"]

pub mod modules;
pub mod seed;

use anyhow::Context;
use bookstore_db::Database;
use bookstore_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Registry holding every catalog module
pub fn registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);
    registry
}

/// Open the configured database, initialize modules and apply migrations.
pub async fn prepare(settings: &Settings) -> anyhow::Result<(Database, ModuleRegistry)> {
    let db = Database::connect(&settings.database.url, settings.database.max_connections)
        .await
        .context("failed to open catalog database")?;

    let registry = registry();
    let ctx = InitCtx {
        settings,
        db: &db,
    };
    registry.init_modules(&ctx).await?;
    registry.migrate(&db).await?;

    Ok((db, registry))
}

/// Run the HTTP server until shutdown, then stop modules and close the pool.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let (db, registry) = prepare(settings).await?;
    let ctx = InitCtx {
        settings,
        db: &db,
    };

    registry.start_modules(&ctx).await?;
    let served = bookstore_http::start_server(&registry, &ctx).await;

    registry.stop_modules().await?;
    db.close().await;
    served
}

#[cfg(test)]
pub(crate) mod test_support {
    use bookstore_db::Database;

    /// Fresh in-memory database with every module's tables.
    pub async fn migrated_db() -> Database {
        let db = Database::in_memory().await.unwrap();
        super::registry().migrate(&db).await.unwrap();
        db
    }
}
