//! Record filtering criteria shared by listings, reports and warranty queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{HearthbookError, ValidationError};
use crate::record::Record;

/// Criteria narrowing the set of records.
///
/// Every present criterion must match. Label criteria are exact matches;
/// `search` is a case-insensitive substring over the reference and the
/// client's name, phone and address. The date range is inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordFilter {
    pub search: Option<String>,
    pub zone: Option<String>,
    pub capacity_kw: Option<String>,
    pub heater: Option<String>,
    pub controller: Option<String>,
    pub card: Option<String>,
    pub body: Option<String>,
    pub sold_by: Option<String>,
    pub lead_source: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl RecordFilter {
    /// Check that the criteria are coherent.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvertedDateRange`] when `date_from` is
    /// after `date_to`.
    pub fn validate(&self) -> Result<(), HearthbookError> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(ValidationError::InvertedDateRange { from, to }.into());
            }
        }
        Ok(())
    }

    /// Whether `record` satisfies every present criterion.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        fn label(expected: Option<&String>, actual: Option<&String>) -> bool {
            expected.is_none_or(|expected| actual == Some(expected))
        }

        if let Some(term) = self.search.as_deref().filter(|t| !t.is_empty()) {
            if !record.search_text().contains(&term.to_lowercase()) {
                return false;
            }
        }

        label(self.zone.as_ref(), record.zone.as_ref())
            && label(self.capacity_kw.as_ref(), record.capacity_kw.as_ref())
            && label(self.heater.as_ref(), record.heater.as_ref())
            && label(self.controller.as_ref(), record.controller.as_ref())
            && label(self.card.as_ref(), record.card.as_ref())
            && label(self.body.as_ref(), record.body.as_ref())
            && label(self.sold_by.as_ref(), record.sold_by.as_ref())
            && label(self.lead_source.as_ref(), record.lead_source.as_ref())
            && self.date_from.is_none_or(|from| record.delivered_on >= from)
            && self.date_to.is_none_or(|to| record.delivered_on <= to)
    }
}

/// Distinct non-null values present for each filterable label, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub zones: Vec<String>,
    pub capacity_kw: Vec<String>,
    pub heaters: Vec<String>,
    pub controllers: Vec<String>,
    pub cards: Vec<String>,
    pub bodies: Vec<String>,
    pub sold_by: Vec<String>,
    pub lead_sources: Vec<String>,
}
