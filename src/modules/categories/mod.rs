pub mod models;
pub mod repo;
pub mod routes;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Migration, Module};
use serde_json::json;

use super::with_description;

/// Categories module: CRUD over book categories
pub struct CategoriesModule;

impl CategoriesModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for CategoriesModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for CategoriesModule {
    fn name(&self) -> &'static str {
        "categories"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "categories module initialized"
        );
        Ok(())
    }

    fn routes(&self, ctx: &InitCtx<'_>) -> Router {
        routes::router(ctx.db.pool().clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json!({
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        });
        let category = json!({
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/Category" }
                }
            }
        });
        let id_param = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer" }
        });

        Some(json!({
            "paths": {
                "/categories/": {
                    "get": {
                        "summary": "List categories",
                        "tags": ["categories"],
                        "parameters": [
                            { "name": "skip", "in": "query", "schema": { "type": "integer", "minimum": 0, "default": 0 } },
                            { "name": "limit", "in": "query", "schema": { "type": "integer", "minimum": 1, "maximum": 1000, "default": 100 } }
                        ],
                        "responses": {
                            "200": {
                                "description": "Categories in insertion order",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Category" }
                                        }
                                    }
                                }
                            },
                            "422": with_description(&error, "Invalid pagination")
                        }
                    },
                    "post": {
                        "summary": "Create a category",
                        "tags": ["categories"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateCategory" }
                                }
                            }
                        },
                        "responses": {
                            "201": with_description(&category, "Created category"),
                            "400": with_description(&error, "Title already exists"),
                            "422": with_description(&error, "Validation error")
                        }
                    }
                },
                "/categories/{id}": {
                    "get": {
                        "summary": "Get a category",
                        "tags": ["categories"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": with_description(&category, "Category"),
                            "404": with_description(&error, "Category not found")
                        }
                    },
                    "put": {
                        "summary": "Update a category",
                        "tags": ["categories"],
                        "parameters": [id_param.clone()],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/UpdateCategory" }
                                }
                            }
                        },
                        "responses": {
                            "200": with_description(&category, "Updated category"),
                            "400": with_description(&error, "Title already exists"),
                            "404": with_description(&error, "Category not found"),
                            "422": with_description(&error, "Validation error")
                        }
                    },
                    "delete": {
                        "summary": "Delete a category",
                        "tags": ["categories"],
                        "parameters": [id_param],
                        "responses": {
                            "204": { "description": "Deleted" },
                            "400": with_description(&error, "Books still reference the category"),
                            "404": with_description(&error, "Category not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Category": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "description": "Unique identifier" },
                            "title": { "type": "string", "minLength": 1, "maxLength": 100 }
                        },
                        "required": ["id", "title"]
                    },
                    "CreateCategory": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "minLength": 1, "maxLength": 100 }
                        },
                        "required": ["title"]
                    },
                    "UpdateCategory": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "minLength": 1, "maxLength": 100 }
                        }
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS categories (
                    id    INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL UNIQUE CHECK (length(title) BETWEEN 1 AND 100)
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "categories module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "categories module stopped");
        Ok(())
    }
}

/// Create a new instance of the categories module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(CategoriesModule::new())
}
