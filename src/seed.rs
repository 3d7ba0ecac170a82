//! Demo catalog data.

use bookstore_db::DbError;
use sqlx::SqlitePool;

use crate::modules::books::{models::CreateBook, repo::BookRepo};
use crate::modules::categories::{models::CreateCategory, repo::CategoryRepo};

struct SeedBook {
    title: &'static str,
    price: f64,
    description: &'static str,
    url: &'static str,
}

const FICTION: &[SeedBook] = &[
    SeedBook {
        title: "Война и мир",
        price: 1200.50,
        description: "Роман Льва Толстого",
        url: "https://example.com/book1",
    },
    SeedBook {
        title: "Преступление и наказание",
        price: 850.00,
        description: "Роман Достоевского",
        url: "https://example.com/book2",
    },
    SeedBook {
        title: "Мастер и Маргарита",
        price: 950.00,
        description: "Роман Булгакова",
        url: "https://example.com/book3",
    },
];

const TECHNICAL: &[SeedBook] = &[
    SeedBook {
        title: "Python для начинающих",
        price: 1500.00,
        description: "Учебник по Python",
        url: "https://example.com/book4",
    },
    SeedBook {
        title: "Чистый код",
        price: 1800.00,
        description: "Книга о программировании",
        url: "https://example.com/book5",
    },
    SeedBook {
        title: "Алгоритмы",
        price: 2000.00,
        description: "Книга об алгоритмах",
        url: "https://example.com/book6",
    },
    SeedBook {
        title: "Базы данных",
        price: 1700.00,
        description: "Учебник по SQL",
        url: "https://example.com/book7",
    },
];

const CATALOG: &[(&str, &[SeedBook])] = &[
    ("Художественная литература", FICTION),
    ("Техническая литература", TECHNICAL),
];

/// What a [`seed`] run inserted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub books: usize,
}

/// Insert the demo categories and their books.
///
/// A category whose title already exists is skipped together with its
/// books, so reruns leave the catalog unchanged.
pub async fn seed(pool: &SqlitePool) -> Result<SeedReport, DbError> {
    let mut report = SeedReport::default();

    for (title, books) in CATALOG {
        if CategoryRepo::find_by_title(pool, title).await?.is_some() {
            tracing::info!(category = %title, "seed category already present; skipping");
            continue;
        }

        let category = CategoryRepo::create(
            pool,
            &CreateCategory {
                title: title.to_string(),
            },
        )
        .await?;
        report.categories += 1;

        for book in *books {
            BookRepo::create(
                pool,
                &CreateBook {
                    title: book.title.to_string(),
                    description: Some(book.description.to_string()),
                    price: book.price,
                    url: Some(book.url.to_string()),
                    category_id: Some(category.id),
                },
            )
            .await?;
            report.books += 1;
        }

        tracing::info!(category = %title, books = books.len(), "seeded category");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::migrated_db;

    #[tokio::test]
    async fn seeds_two_categories_and_seven_books_once() {
        let db = migrated_db().await;

        let first = seed(db.pool()).await.unwrap();
        assert_eq!(
            first,
            SeedReport {
                categories: 2,
                books: 7
            }
        );

        let second = seed(db.pool()).await.unwrap();
        assert_eq!(second, SeedReport::default());

        let fiction = CategoryRepo::find_by_title(db.pool(), "Художественная литература")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            CategoryRepo::count_books(db.pool(), fiction.id)
                .await
                .unwrap(),
            3
        );

        let found = BookRepo::search_by_title(db.pool(), "мастер").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category, Some(fiction));
    }
}
