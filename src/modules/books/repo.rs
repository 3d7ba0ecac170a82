//! Data access for the `books` table.

use bookstore_db::DbError;
use sqlx::SqlitePool;

use super::models::{Book, BookRow, CreateBook, UpdateBook};

const SELECT_BOOK: &str = r#"
    SELECT b.id, b.title, b.description, b.price, b.url, b.category_id,
           c.title AS category_title
    FROM books b
    LEFT JOIN categories c ON c.id = b.category_id
"#;

/// Stateless CRUD over `books`; every method takes the pool first.
pub struct BookRepo;

impl BookRepo {
    pub async fn create(pool: &SqlitePool, input: &CreateBook) -> Result<Book, DbError> {
        let result = sqlx::query(
            "INSERT INTO books (title, description, price, url, category_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.url)
        .bind(input.category_id)
        .execute(pool)
        .await?;

        let id = result.last_insert_rowid();
        Self::find_by_id(pool, id)
            .await?
            .ok_or(DbError::Sqlx(sqlx::Error::RowNotFound))
    }

    /// Page through books in insertion order.
    pub async fn list(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<Book>, DbError> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "{SELECT_BOOK} ORDER BY b.id LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Book>, DbError> {
        let row = sqlx::query_as::<_, BookRow>(&format!("{SELECT_BOOK} WHERE b.id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Book::from))
    }

    /// Every book in the category, in insertion order.
    pub async fn list_by_category(
        pool: &SqlitePool,
        category_id: i64,
    ) -> Result<Vec<Book>, DbError> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "{SELECT_BOOK} WHERE b.category_id = ? ORDER BY b.id"
        ))
        .bind(category_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    /// Case-insensitive substring match on title.
    ///
    /// SQLite's `lower()` and `LIKE` fold ASCII only, so folding happens here
    /// to cover titles in any script.
    pub async fn search_by_title(pool: &SqlitePool, term: &str) -> Result<Vec<Book>, DbError> {
        let needle = term.to_lowercase();
        let rows = sqlx::query_as::<_, BookRow>(&format!("{SELECT_BOOK} ORDER BY b.id"))
            .fetch_all(pool)
            .await?;
        Ok(rows
            .into_iter()
            .filter(|row| row.title.to_lowercase().contains(&needle))
            .map(Book::from)
            .collect())
    }

    /// Overwrite only the fields set in `changes`; `Ok(None)` when `id` is unknown.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        changes: &UpdateBook,
    ) -> Result<Option<Book>, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE books SET
                title       = COALESCE(?, title),
                description = COALESCE(?, description),
                price       = COALESCE(?, price),
                url         = COALESCE(?, url),
                category_id = COALESCE(?, category_id)
            WHERE id = ?
            "#,
        )
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.price)
        .bind(&changes.url)
        .bind(changes.category_id)
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// Remove the row; `false` when `id` is unknown.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
