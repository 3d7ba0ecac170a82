//! Field constraint checks applied to request bodies before they reach storage.

use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;

/// Accumulates field violations so a single response can report all of them.
#[derive(Debug, Default)]
pub struct Violations {
    details: Vec<serde_json::Value>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `value` to be between `min` and `max` characters long.
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.chars().count();
        if len < min {
            self.push(field, format!("must be at least {min} characters"));
        } else if len > max {
            self.push(field, format!("must be at most {max} characters"));
        }
        self
    }

    /// Require `value` to be a finite number strictly greater than zero.
    pub fn positive(&mut self, field: &str, value: f64) -> &mut Self {
        if !value.is_finite() || value <= 0.0 {
            self.push(field, "must be greater than 0".to_string());
        }
        self
    }

    /// Require `value` to fall within `min..=max`.
    pub fn range(&mut self, field: &str, value: i64, min: i64, max: i64) -> &mut Self {
        if value < min || value > max {
            self.push(field, format!("must be between {min} and {max}"));
        }
        self
    }

    /// `Ok` when nothing was recorded, otherwise a validation error.
    pub fn finish(&mut self) -> Result<(), AppError> {
        if self.details.is_empty() {
            return Ok(());
        }
        Err(AppError::validation(
            std::mem::take(&mut self.details),
            "Request failed field validation",
        ))
    }

    fn push(&mut self, field: &str, error: String) {
        self.details.push(json!({ "field": field, "error": error }));
    }
}

/// Offset/limit pagination shared by the collection endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "Pagination::default_limit")]
    pub limit: i64,
}

impl Pagination {
    pub const MAX_LIMIT: i64 = 1000;

    fn default_limit() -> i64 {
        100
    }

    pub fn validate(&self) -> Result<(), AppError> {
        Violations::new()
            .range("skip", self.skip, 0, i64::MAX)
            .range("limit", self.limit, 1, Self::MAX_LIMIT)
            .finish()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: Self::default_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_counts_characters_not_bytes() {
        // 10 characters, 19 bytes
        let title = "Алгоритмы!";
        assert!(Violations::new().length("title", title, 1, 10).finish().is_ok());
        assert!(Violations::new().length("title", title, 1, 9).finish().is_err());
    }

    #[test]
    fn reports_every_violation() {
        let err = Violations::new()
            .length("title", "", 1, 200)
            .positive("price", -3.0)
            .length("url", &"x".repeat(501), 0, 500)
            .finish()
            .unwrap_err();

        match err {
            AppError::Validation { details, .. } => {
                let fields: Vec<_> = details.iter().map(|d| d["field"].clone()).collect();
                assert_eq!(fields, vec!["title", "price", "url"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn zero_and_nan_prices_are_rejected() {
        assert!(Violations::new().positive("price", 0.0).finish().is_err());
        assert!(Violations::new().positive("price", f64::NAN).finish().is_err());
        assert!(Violations::new().positive("price", 0.01).finish().is_ok());
    }

    #[test]
    fn pagination_bounds() {
        assert!(Pagination::default().validate().is_ok());
        assert!(Pagination { skip: -1, limit: 10 }.validate().is_err());
        assert!(Pagination { skip: 0, limit: 0 }.validate().is_err());
        assert!(Pagination { skip: 0, limit: 1001 }.validate().is_err());
        assert!(Pagination { skip: 5, limit: 1000 }.validate().is_ok());
    }
}
