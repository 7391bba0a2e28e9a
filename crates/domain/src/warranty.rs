//! Warranty: one year of cover counted from the delivery date.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{HearthbookError, ValidationError};

/// Length of the warranty in days.
pub const WARRANTY_DAYS: i64 = 365;

/// Default look-ahead for "expiring soon".
pub const DEFAULT_EXPIRING_SOON_DAYS: u32 = 30;

/// Where a delivered unit stands relative to its warranty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarrantyStatus {
    InWarranty,
    ExpiringSoon,
    OutOfWarranty,
}

/// Last day covered for a unit delivered on `delivered_on`.
///
/// `None` when that day lies past the last representable date.
#[must_use]
pub fn expiry(delivered_on: NaiveDate) -> Option<NaiveDate> {
    delivered_on.checked_add_signed(Duration::days(WARRANTY_DAYS))
}

/// Classify a unit on `today`, with `days_soon` as the expiring-soon window.
#[must_use]
pub fn status(delivered_on: NaiveDate, today: NaiveDate, days_soon: u32) -> WarrantyStatus {
    let Some(expires) = expiry(delivered_on) else {
        return WarrantyStatus::InWarranty;
    };
    if expires < today {
        return WarrantyStatus::OutOfWarranty;
    }
    if (expires - today).num_days() <= i64::from(days_soon) {
        WarrantyStatus::ExpiringSoon
    } else {
        WarrantyStatus::InWarranty
    }
}

/// Check an expiring-soon window.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidWarrantyWindow`] unless `days` is in `1..=365`.
pub fn validate_window(days: u32) -> Result<(), HearthbookError> {
    if days == 0 || i64::from(days) > WARRANTY_DAYS {
        return Err(ValidationError::InvalidWarrantyWindow(days).into());
    }
    Ok(())
}

/// Delivery dates strictly before this one are out of warranty on `today`.
#[must_use]
pub fn out_of_warranty_before(today: NaiveDate) -> NaiveDate {
    days_before(today, WARRANTY_DAYS)
}

/// Inclusive delivery-date range of units whose warranty ends within `days`.
#[must_use]
pub fn expiring_soon_range(today: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
    let oldest = days_before(today, WARRANTY_DAYS);
    let newest = days_before(today, WARRANTY_DAYS - i64::from(days));
    (oldest, newest)
}

fn days_before(day: NaiveDate, days: i64) -> NaiveDate {
    day.checked_sub_signed(Duration::days(days))
        .unwrap_or(NaiveDate::MIN)
}

/// Counts of units per warranty status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantySummary {
    pub in_warranty: u64,
    pub out_of_warranty: u64,
    pub expiring_soon: u64,
    pub total: u64,
}

impl WarrantySummary {
    /// Classify every delivery date.
    #[must_use]
    pub fn tally<I>(deliveries: I, today: NaiveDate, days_soon: u32) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        deliveries
            .into_iter()
            .fold(Self::default(), |mut summary, delivered_on| {
                match status(delivered_on, today, days_soon) {
                    WarrantyStatus::InWarranty => summary.in_warranty += 1,
                    WarrantyStatus::ExpiringSoon => summary.expiring_soon += 1,
                    WarrantyStatus::OutOfWarranty => summary.out_of_warranty += 1,
                }
                summary.total += 1;
                summary
            })
    }
}
