use bookstore_http::{error::AppError, validation::Violations};
use serde::{Deserialize, Serialize};

pub const TITLE_MAX: usize = 100;

/// A named grouping of books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// Unique identifier for the category
    pub id: i64,
    /// Title of the category, unique across all categories
    pub title: String,
}

/// Request model for creating a new category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategory {
    pub title: String,
}

impl CreateCategory {
    pub fn validate(&self) -> Result<(), AppError> {
        Violations::new()
            .length("title", &self.title, 1, TITLE_MAX)
            .finish()
    }
}

/// Partial update: `None` leaves the stored title untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategory {
    #[serde(default)]
    pub title: Option<String>,
}

impl UpdateCategory {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut violations = Violations::new();
        if let Some(title) = &self.title {
            violations.length("title", title, 1, TITLE_MAX);
        }
        violations.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_length_bounds() {
        let ok = CreateCategory {
            title: "a".repeat(TITLE_MAX),
        };
        assert!(ok.validate().is_ok());

        let long = CreateCategory {
            title: "a".repeat(TITLE_MAX + 1),
        };
        assert!(long.validate().is_err());

        let empty = CreateCategory {
            title: String::new(),
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(UpdateCategory::default().validate().is_ok());
        let blank = UpdateCategory {
            title: Some(String::new()),
        };
        assert!(blank.validate().is_err());
    }
}
