//! Data access for the `categories` table.

use bookstore_db::DbError;
use sqlx::SqlitePool;

use super::models::{Category, CreateCategory, UpdateCategory};

/// Stateless CRUD over `categories`; every method takes the pool first.
pub struct CategoryRepo;

impl CategoryRepo {
    pub async fn create(pool: &SqlitePool, input: &CreateCategory) -> Result<Category, DbError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (title) VALUES (?) RETURNING id, title",
        )
        .bind(&input.title)
        .fetch_one(pool)
        .await?;
        Ok(category)
    }

    /// Page through categories in insertion order.
    pub async fn list(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<Category>, DbError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, title FROM categories ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;
        Ok(categories)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Category>, DbError> {
        let category =
            sqlx::query_as::<_, Category>("SELECT id, title FROM categories WHERE id = ?")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(category)
    }

    /// Exact, case-sensitive title lookup.
    pub async fn find_by_title(
        pool: &SqlitePool,
        title: &str,
    ) -> Result<Option<Category>, DbError> {
        let category =
            sqlx::query_as::<_, Category>("SELECT id, title FROM categories WHERE title = ?")
                .bind(title)
                .fetch_optional(pool)
                .await?;
        Ok(category)
    }

    /// Apply `changes`; `Ok(None)` when `id` is unknown.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        changes: &UpdateCategory,
    ) -> Result<Option<Category>, DbError> {
        let Some(title) = &changes.title else {
            return Self::find_by_id(pool, id).await;
        };

        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories SET title = ? WHERE id = ? RETURNING id, title",
        )
        .bind(title)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(category)
    }

    /// Remove the row; `false` when `id` is unknown.
    ///
    /// Callers check [`CategoryRepo::count_books`] first.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of books referencing the category.
    pub async fn count_books(pool: &SqlitePool, id: i64) -> Result<i64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE category_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
