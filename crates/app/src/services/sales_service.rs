//! Sales service: the sales report over a filtered set of records.

use hearthbook_domain::error::HearthbookError;
use hearthbook_domain::filter::RecordFilter;
use hearthbook_domain::sales::{self, SalesSummary};

use crate::ports::RecordRepository;

/// Application service producing sales reports.
pub struct SalesService<R> {
    repo: R,
}

impl<R: RecordRepository> SalesService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Summarize every record matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`HearthbookError::Validation`] for an incoherent filter, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn summary(&self, filter: &RecordFilter) -> Result<SalesSummary, HearthbookError> {
        filter.validate()?;
        let orders = self.repo.fetch_filtered(filter).await?;
        let summary = sales::summarize(&orders);
        tracing::debug!(
            orders = orders.len(),
            months = summary.monthly_trends.len(),
            projected = summary.projected_sales.len(),
            "sales summary computed"
        );
        Ok(summary)
    }
}
