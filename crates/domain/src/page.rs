//! Pagination and sorting for record listings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HearthbookError, ValidationError};

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// A 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a validated page request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPage`] when `page` is 0 and
    /// [`ValidationError::InvalidPageSize`] when `page_size` is outside
    /// `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u32, page_size: u32) -> Result<Self, HearthbookError> {
        let request = Self { page, page_size };
        request.validate()?;
        Ok(request)
    }

    /// Check the window bounds.
    ///
    /// # Errors
    ///
    /// See [`PageRequest::new`].
    pub fn validate(&self) -> Result<(), HearthbookError> {
        if self.page == 0 {
            return Err(ValidationError::InvalidPage.into());
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ValidationError::InvalidPageSize {
                value: self.page_size,
                max: MAX_PAGE_SIZE,
            }
            .into());
        }
        Ok(())
    }

    /// Number of rows to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Number of rows to return.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// Column a listing is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    DeliveredOn,
    CreatedAt,
    Reference,
    ClientName,
    SalePrice,
}

impl SortField {
    /// Name as accepted by [`FromStr`] and used for storage columns.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeliveredOn => "delivered_on",
            Self::CreatedAt => "created_at",
            Self::Reference => "reference",
            Self::ClientName => "client_name",
            Self::SalePrice => "sale_price",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delivered_on" | "date_of_delivery" => Ok(Self::DeliveredOn),
            "created_at" => Ok(Self::CreatedAt),
            "reference" | "record_id" => Ok(Self::Reference),
            "client_name" => Ok(Self::ClientName),
            "sale_price" => Ok(Self::SalePrice),
            other => Err(ValidationError::UnknownSortField(other.to_owned())),
        }
    }
}

/// Ordering of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub descending: bool,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            field: SortField::DeliveredOn,
            descending: true,
        }
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}
