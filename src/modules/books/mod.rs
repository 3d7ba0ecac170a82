pub mod models;
pub mod repo;
pub mod routes;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Migration, Module};
use serde_json::json;

use super::with_description;

/// Books module: CRUD and search over the catalog's books
pub struct BooksModule;

impl BooksModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
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
        let book = json!({
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/Book" }
                }
            }
        });
        let id_param = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer" }
        });
        let body = |schema: &str| {
            json!({
                "required": true,
                "content": {
                    "application/json": {
                        "schema": { "$ref": format!("#/components/schemas/{schema}") }
                    }
                }
            })
        };
        let book_fields = json!({
            "title": { "type": "string", "minLength": 1, "maxLength": 200 },
            "description": { "type": ["string", "null"] },
            "price": { "type": "number", "exclusiveMinimum": 0 },
            "url": { "type": ["string", "null"], "maxLength": 500 },
            "category_id": { "type": ["integer", "null"] }
        });

        let mut book_schema = book_fields.clone();
        book_schema["id"] = json!({ "type": "integer", "description": "Unique identifier" });
        book_schema["category"] = json!({
            "oneOf": [
                { "$ref": "#/components/schemas/Category" },
                { "type": "null" }
            ],
            "readOnly": true
        });

        Some(json!({
            "paths": {
                "/books/": {
                    "get": {
                        "summary": "List books",
                        "description": "Filters are exclusive: search, then category_id, then skip/limit paging.",
                        "tags": ["books"],
                        "parameters": [
                            { "name": "skip", "in": "query", "schema": { "type": "integer", "minimum": 0, "default": 0 } },
                            { "name": "limit", "in": "query", "schema": { "type": "integer", "minimum": 1, "maximum": 1000, "default": 100 } },
                            { "name": "category_id", "in": "query", "schema": { "type": "integer" } },
                            { "name": "search", "in": "query", "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "Matching books in insertion order",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "422": with_description(&error, "Invalid query")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["books"],
                        "requestBody": body("CreateBook"),
                        "responses": {
                            "201": with_description(&book, "Created book"),
                            "404": with_description(&error, "Category not found"),
                            "422": with_description(&error, "Validation error")
                        }
                    }
                },
                "/books/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["books"],
                        "parameters": [id_param.clone()],
                        "responses": {
                            "200": with_description(&book, "Book"),
                            "404": with_description(&error, "Book not found")
                        }
                    },
                    "put": {
                        "summary": "Update a book",
                        "description": "Only fields present and non-null in the body are changed.",
                        "tags": ["books"],
                        "parameters": [id_param.clone()],
                        "requestBody": body("UpdateBook"),
                        "responses": {
                            "200": with_description(&book, "Updated book"),
                            "404": with_description(&error, "Book or category not found"),
                            "422": with_description(&error, "Validation error")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["books"],
                        "parameters": [id_param],
                        "responses": {
                            "204": { "description": "Deleted" },
                            "404": with_description(&error, "Book not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": book_schema,
                        "required": ["id", "title", "price"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": book_fields.clone(),
                        "required": ["title", "price"]
                    },
                    "UpdateBook": {
                        "type": "object",
                        "properties": book_fields
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        // `categories` may not exist yet; SQLite resolves REFERENCES at write time.
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    title       TEXT NOT NULL CHECK (length(title) BETWEEN 1 AND 200),
                    description TEXT,
                    price       REAL NOT NULL CHECK (price > 0),
                    url         TEXT CHECK (url IS NULL OR length(url) <= 500),
                    category_id INTEGER REFERENCES categories(id)
                );
                CREATE INDEX IF NOT EXISTS books_category_id_idx ON books(category_id);
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}
