use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, MethodRouter},
    Json, Router,
};
use bookstore_http::{
    error::AppError,
    extract::{JsonBody, PathParam, QueryParams},
};
use sqlx::SqlitePool;

use super::models::{Book, BookFilter, BookQuery, CreateBook, UpdateBook};
use super::repo::BookRepo;
use crate::modules::categories::{repo::CategoryRepo, routes::not_found as category_not_found};

/// Book routes with the pool applied as state
pub fn router(pool: SqlitePool) -> Router {
    let collection: MethodRouter<SqlitePool> = get(list_books).post(create_book);

    Router::new()
        .route("/books", collection.clone())
        .route("/books/", collection)
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(pool)
}

fn not_found(id: i64) -> AppError {
    AppError::not_found(format!("Book with ID {id} not found"))
}

/// Fail with not-found unless `category_id` is unset or resolves.
async fn ensure_category(pool: &SqlitePool, category_id: Option<i64>) -> Result<(), AppError> {
    let Some(category_id) = category_id else {
        return Ok(());
    };
    match CategoryRepo::find_by_id(pool, category_id).await? {
        Some(_) => Ok(()),
        None => Err(category_not_found(category_id)),
    }
}

async fn list_books(
    State(pool): State<SqlitePool>,
    QueryParams(query): QueryParams<BookQuery>,
) -> Result<Json<Vec<Book>>, AppError> {
    query.pagination().validate()?;

    let books = match query.filter() {
        BookFilter::Search(term) => BookRepo::search_by_title(&pool, &term).await?,
        BookFilter::Category(category_id) => BookRepo::list_by_category(&pool, category_id).await?,
        BookFilter::Page { skip, limit } => BookRepo::list(&pool, skip, limit).await?,
    };
    Ok(Json(books))
}

async fn get_book(
    State(pool): State<SqlitePool>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Book>, AppError> {
    BookRepo::find_by_id(&pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

async fn create_book(
    State(pool): State<SqlitePool>,
    JsonBody(input): JsonBody<CreateBook>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    input.validate()?;
    ensure_category(&pool, input.category_id).await?;

    let book = BookRepo::create(&pool, &input).await?;

    tracing::info!(book_id = book.id, category_id = ?book.category_id, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(pool): State<SqlitePool>,
    PathParam(id): PathParam<i64>,
    JsonBody(changes): JsonBody<UpdateBook>,
) -> Result<Json<Book>, AppError> {
    changes.validate()?;

    if BookRepo::find_by_id(&pool, id).await?.is_none() {
        return Err(not_found(id));
    }
    ensure_category(&pool, changes.category_id).await?;

    let book = BookRepo::update(&pool, id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(book_id = id, "book updated");
    Ok(Json(book))
}

async fn delete_book(
    State(pool): State<SqlitePool>,
    PathParam(id): PathParam<i64>,
) -> Result<StatusCode, AppError> {
    if !BookRepo::delete(&pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(book_id = id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}
