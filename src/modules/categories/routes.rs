use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, MethodRouter},
    Json, Router,
};
use bookstore_http::{
    error::AppError,
    extract::{JsonBody, PathParam, QueryParams},
    validation::Pagination,
};
use serde_json::json;
use sqlx::SqlitePool;

use super::models::{Category, CreateCategory, UpdateCategory};
use super::repo::CategoryRepo;

/// Category routes with the pool applied as state
pub fn router(pool: SqlitePool) -> Router {
    let collection: MethodRouter<SqlitePool> = get(list_categories).post(create_category);

    Router::new()
        .route("/categories", collection.clone())
        .route("/categories/", collection)
        .route(
            "/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .with_state(pool)
}

pub(crate) fn not_found(id: i64) -> AppError {
    AppError::not_found(format!("Category with ID {id} not found"))
}

fn title_taken(title: &str) -> AppError {
    AppError::conflict(
        vec![json!({"field": "title", "error": "already exists"})],
        format!("Category with title '{title}' already exists"),
    )
}

async fn list_categories(
    State(pool): State<SqlitePool>,
    QueryParams(page): QueryParams<Pagination>,
) -> Result<Json<Vec<Category>>, AppError> {
    page.validate()?;
    let categories = CategoryRepo::list(&pool, page.skip, page.limit).await?;
    Ok(Json(categories))
}

async fn get_category(
    State(pool): State<SqlitePool>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Category>, AppError> {
    CategoryRepo::find_by_id(&pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

async fn create_category(
    State(pool): State<SqlitePool>,
    JsonBody(input): JsonBody<CreateCategory>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    input.validate()?;

    if CategoryRepo::find_by_title(&pool, &input.title)
        .await?
        .is_some()
    {
        return Err(title_taken(&input.title));
    }

    // A concurrent insert can still win the race; the unique index catches it.
    let category = CategoryRepo::create(&pool, &input).await.map_err(|e| {
        if e.is_unique_violation() {
            title_taken(&input.title)
        } else {
            e.into()
        }
    })?;

    tracing::info!(category_id = category.id, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category(
    State(pool): State<SqlitePool>,
    PathParam(id): PathParam<i64>,
    JsonBody(changes): JsonBody<UpdateCategory>,
) -> Result<Json<Category>, AppError> {
    changes.validate()?;

    if CategoryRepo::find_by_id(&pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    if let Some(title) = &changes.title {
        if let Some(existing) = CategoryRepo::find_by_title(&pool, title).await? {
            if existing.id != id {
                return Err(title_taken(title));
            }
        }
    }

    let updated = CategoryRepo::update(&pool, id, &changes)
        .await
        .map_err(|e| match &changes.title {
            Some(title) if e.is_unique_violation() => title_taken(title),
            _ => e.into(),
        })?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(category_id = id, "category updated");
    Ok(Json(updated))
}

async fn delete_category(
    State(pool): State<SqlitePool>,
    PathParam(id): PathParam<i64>,
) -> Result<StatusCode, AppError> {
    if CategoryRepo::find_by_id(&pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    let blocking = CategoryRepo::count_books(&pool, id).await?;
    if blocking > 0 {
        return Err(AppError::conflict(
            vec![json!({"field": "id", "error": "category has books", "books": blocking})],
            format!(
                "Cannot delete a category that still has books. Remove its {blocking} book(s) first."
            ),
        ));
    }

    if !CategoryRepo::delete(&pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(category_id = id, "category deleted");
    Ok(StatusCode::NO_CONTENT)
}
