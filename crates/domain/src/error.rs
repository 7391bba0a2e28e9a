//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`HearthbookError`] via `From`.

use chrono::NaiveDate;

/// Top-level error returned by services and repositories.
#[derive(Debug, thiserror::Error)]
pub enum HearthbookError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant or input constraint was violated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("client name must not be empty")]
    EmptyClientName,

    #[error("sale price must be a finite, non-negative amount, got {0}")]
    InvalidPrice(f64),

    #[error("date range is inverted: {from} is after {to}")]
    InvertedDateRange { from: NaiveDate, to: NaiveDate },

    #[error("page must be at least 1")]
    InvalidPage,

    #[error("page size must be between 1 and {max}, got {value}")]
    InvalidPageSize { value: u32, max: u32 },

    #[error("limit must be between 1 and {max}, got {value}")]
    InvalidLimit { value: u32, max: u32 },

    #[error("warranty window must be between 1 and 365 days, got {0}")]
    InvalidWarrantyWindow(u32),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("unknown sort field: {0}")]
    UnknownSortField(String),
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
