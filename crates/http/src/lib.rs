//! HTTP server facade for the bookstore service: Axum router assembly,
//! error mapping, request extraction and OpenAPI support.

use anyhow::Context;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::json;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use bookstore_db::Database;
use bookstore_kernel::{InitCtx, ModuleRegistry};

pub mod error;
pub mod extract;
pub mod router;
pub mod validation;

use router::{RouterBuilder, API_DESCRIPTION, API_TITLE};

/// Start the HTTP server and serve until Ctrl-C
pub async fn start_server(registry: &ModuleRegistry, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
    let server = &ctx.settings.server;
    tracing::info!("starting HTTP server on {}:{}", server.host, server.port);

    let app = build_router(registry, ctx);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", server.host, server.port))
        .await
        .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        server.host,
        server.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted
pub fn build_router(registry: &ModuleRegistry, ctx: &InitCtx<'_>) -> Router {
    let mut router_builder = RouterBuilder::new().merge(system_routes(ctx.db.clone()));

    for module in registry.modules() {
        router_builder = router_builder.mount_module(module.name(), module.routes(ctx));
    }

    router_builder
        .with_openapi(registry)
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(ctx.settings.server.request_timeout_ms)
        .build()
}

/// Liveness and metadata endpoints
fn system_routes(db: Database) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/info", get(api_info))
        .with_state(db)
}

#[derive(Debug, Serialize)]
struct HealthCheck {
    status: &'static str,
    database: &'static str,
    timestamp: String,
}

/// Health check endpoint
async fn health_check(State(db): State<Database>) -> Json<HealthCheck> {
    let database = match db.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "health check could not reach the database");
            "disconnected"
        }
    };

    Json(HealthCheck {
        status: "OK",
        database,
        timestamp: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default(),
    })
}

/// Static API metadata
async fn api_info() -> Json<serde_json::Value> {
    Json(json!({
        "name": API_TITLE,
        "version": env!("CARGO_PKG_VERSION"),
        "description": API_DESCRIPTION,
        "endpoints": {
            "categories": "/categories",
            "books": "/books",
            "health": "/health",
            "docs": "/swagger-ui",
            "openapi": "/docs/openapi.json"
        }
    }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use bookstore_kernel::settings::Settings;
    use tower::ServiceExt;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_database_status() {
        let settings = Settings::default();
        let db = Database::in_memory().await.unwrap();
        let ctx = InitCtx {
            settings: &settings,
            db: &db,
        };
        let app = build_router(&ModuleRegistry::new(), &ctx);

        for uri in ["/", "/health"] {
            let (status, json) = get_json(app.clone(), uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["status"], "OK");
            assert_eq!(json["database"], "connected");
            assert!(json["timestamp"].is_string());
        }

        db.close().await;
        let (_, json) = get_json(app, "/health").await;
        assert_eq!(json["database"], "disconnected");
    }

    #[tokio::test]
    async fn info_lists_endpoints() {
        let settings = Settings::default();
        let db = Database::in_memory().await.unwrap();
        let ctx = InitCtx {
            settings: &settings,
            db: &db,
        };
        let app = build_router(&ModuleRegistry::new(), &ctx);

        let (status, json) = get_json(app, "/info").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], API_TITLE);
        assert_eq!(json["endpoints"]["books"], "/books");
        assert_eq!(json["endpoints"]["categories"], "/categories");
    }
}
