//! Warranty service: warranty counts and warranty-based record listings.

use chrono::NaiveDate;

use hearthbook_domain::error::HearthbookError;
use hearthbook_domain::filter::RecordFilter;
use hearthbook_domain::page::{Page, PageRequest, Sort, SortField};
use hearthbook_domain::record::Record;
use hearthbook_domain::warranty::{self, WarrantySummary};

use crate::ports::RecordRepository;

/// Application service answering warranty questions about delivered units.
pub struct WarrantyService<R> {
    repo: R,
}

impl<R: RecordRepository> WarrantyService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Count records per warranty status as of `today`.
    ///
    /// # Errors
    ///
    /// Returns [`HearthbookError::Validation`] unless `days_soon` is in
    /// `1..=365`, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn summary(
        &self,
        today: NaiveDate,
        days_soon: u32,
    ) -> Result<WarrantySummary, HearthbookError> {
        warranty::validate_window(days_soon)?;
        let orders = self.repo.fetch_filtered(&RecordFilter::default()).await?;
        Ok(WarrantySummary::tally(
            orders.iter().map(|order| order.delivered_on),
            today,
            days_soon,
        ))
    }

    /// Records whose warranty has lapsed, newest delivery first.
    ///
    /// # Errors
    ///
    /// Returns [`HearthbookError::Validation`] for an invalid page window,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn out_of_warranty(
        &self,
        today: NaiveDate,
        page: PageRequest,
    ) -> Result<Page<Record>, HearthbookError> {
        let filter = RecordFilter {
            date_to: Some(
                warranty::out_of_warranty_before(today)
                    .pred_opt()
                    .unwrap_or(NaiveDate::MIN),
            ),
            ..RecordFilter::default()
        };
        self.page(&filter, page, true).await
    }

    /// Records whose warranty ends within `days`, oldest delivery first.
    ///
    /// # Errors
    ///
    /// Returns [`HearthbookError::Validation`] for an invalid window or page,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn expiring_soon(
        &self,
        today: NaiveDate,
        days: u32,
        page: PageRequest,
    ) -> Result<Page<Record>, HearthbookError> {
        warranty::validate_window(days)?;
        let (oldest, newest) = warranty::expiring_soon_range(today, days);
        let filter = RecordFilter {
            date_from: Some(oldest),
            date_to: Some(newest),
            ..RecordFilter::default()
        };
        self.page(&filter, page, false).await
    }

    async fn page(
        &self,
        filter: &RecordFilter,
        page: PageRequest,
        descending: bool,
    ) -> Result<Page<Record>, HearthbookError> {
        page.validate()?;
        let sort = Sort {
            field: SortField::DeliveredOn,
            descending,
        };
        let (records, total) = self.repo.list(filter, page, sort).await?;
        Ok(Page {
            records,
            total,
            page: page.page,
            page_size: page.page_size,
        })
    }
}
