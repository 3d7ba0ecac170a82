use bookstore_http::{
    error::AppError,
    validation::{Pagination, Violations},
};
use serde::{Deserialize, Serialize};

use crate::modules::categories::models::Category;

pub const TITLE_MAX: usize = 200;
pub const URL_MAX: usize = 500;

/// A book in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier for the book
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Strictly positive
    pub price: f64,
    pub url: Option<String>,
    pub category_id: Option<i64>,
    /// Resolved category, read-only
    pub category: Option<Category>,
}

/// Row shape of a `books` query joined with its category title.
#[derive(Debug, sqlx::FromRow)]
pub struct BookRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub url: Option<String>,
    pub category_id: Option<i64>,
    pub category_title: Option<String>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        let category = match (row.category_id, row.category_title) {
            (Some(id), Some(title)) => Some(Category { id, title }),
            _ => None,
        };
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            price: row.price,
            url: row.url,
            category_id: row.category_id,
            category,
        }
    }
}

/// Request model for creating a new book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBook {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

impl CreateBook {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut violations = Violations::new();
        violations
            .length("title", &self.title, 1, TITLE_MAX)
            .positive("price", self.price);
        if let Some(url) = &self.url {
            violations.length("url", url, 0, URL_MAX);
        }
        violations.finish()
    }
}

/// Partial update: only `Some` fields overwrite stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBook {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

impl UpdateBook {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut violations = Violations::new();
        if let Some(title) = &self.title {
            violations.length("title", title, 1, TITLE_MAX);
        }
        if let Some(price) = self.price {
            violations.positive("price", price);
        }
        if let Some(url) = &self.url {
            violations.length("url", url, 0, URL_MAX);
        }
        violations.finish()
    }
}

/// Query string accepted by `GET /books/`.
///
/// Filters are exclusive: `search` wins over `category_id`, which wins over
/// plain pagination.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookQuery {
    #[serde(default)]
    pub skip: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookFilter {
    Search(String),
    Category(i64),
    Page { skip: i64, limit: i64 },
}

impl BookQuery {
    /// Offset/limit with defaults applied; validated even when a filter wins.
    pub fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination {
            skip: self.skip.unwrap_or(defaults.skip),
            limit: self.limit.unwrap_or(defaults.limit),
        }
    }

    pub fn filter(self) -> BookFilter {
        let page = self.pagination();
        if let Some(term) = self.search.filter(|term| !term.is_empty()) {
            return BookFilter::Search(term);
        }
        if let Some(category_id) = self.category_id {
            return BookFilter::Category(category_id);
        }
        BookFilter::Page {
            skip: page.skip,
            limit: page.limit,
        }
    }
}
