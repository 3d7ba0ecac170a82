use anyhow::Context;
use clap::{Parser, Subcommand};

use bookstore_kernel::settings::Settings;

/// Bookstore catalog service
#[derive(Debug, Parser)]
#[command(name = "bookstore", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API until Ctrl-C
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Apply migrations, then insert the demo categories and books
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load bookstore settings")?;
    bookstore_telemetry::init(&settings.telemetry)?;

    tracing::info!(env = ?settings.environment, command = ?cli.command, "bookstore CLI");

    match cli.command {
        Command::Serve => bookstore_app::serve(&settings).await?,
        Command::Migrate => {
            let (db, _registry) = bookstore_app::prepare(&settings).await?;
            db.close().await;
        }
        Command::Seed => {
            let (db, _registry) = bookstore_app::prepare(&settings).await?;
            let report = bookstore_app::seed::seed(db.pool())
                .await
                .context("failed to seed catalog")?;
            tracing::info!(
                categories = report.categories,
                books = report.books,
                "seed complete"
            );
            db.close().await;
        }
    }

    Ok(())
}
