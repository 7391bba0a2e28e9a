//! Storage port: repository trait for record persistence.

use std::future::Future;

use hearthbook_domain::error::HearthbookError;
use hearthbook_domain::filter::{FilterOptions, RecordFilter};
use hearthbook_domain::id::RecordId;
use hearthbook_domain::page::{PageRequest, Sort};
use hearthbook_domain::record::Record;
use hearthbook_domain::sales::OrderRecord;

/// Repository for persisting and querying [`Record`]s.
pub trait RecordRepository {
    /// Create a new record in storage.
    fn create(&self, record: Record)
    -> impl Future<Output = Result<Record, HearthbookError>> + Send;

    /// Get a record by its unique identifier.
    fn get_by_id(
        &self,
        id: RecordId,
    ) -> impl Future<Output = Result<Option<Record>, HearthbookError>> + Send;

    /// Replace a stored record.
    fn update(&self, record: Record)
    -> impl Future<Output = Result<Record, HearthbookError>> + Send;

    /// Delete a record, returning whether it existed.
    fn delete(&self, id: RecordId) -> impl Future<Output = Result<bool, HearthbookError>> + Send;

    /// Reference of the most recently created record.
    fn last_reference(
        &self,
    ) -> impl Future<Output = Result<Option<String>, HearthbookError>> + Send;

    /// One page of matching records, plus the number of matches before paging.
    fn list(
        &self,
        filter: &RecordFilter,
        page: PageRequest,
        sort: Sort,
    ) -> impl Future<Output = Result<(Vec<Record>, u64), HearthbookError>> + Send;

    /// Order snapshots of every matching record, for reporting.
    ///
    /// Both the sales summary and the warranty tally read these; the
    /// delivery date is all the warranty tally needs from each row.
    fn fetch_filtered(
        &self,
        filter: &RecordFilter,
    ) -> impl Future<Output = Result<Vec<OrderRecord>, HearthbookError>> + Send;

    /// Records with exactly this client phone, newest delivery first.
    fn find_by_client_phone(
        &self,
        phone: &str,
        exclude: Option<RecordId>,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Record>, HearthbookError>> + Send;

    /// Distinct values present for each filterable label.
    fn filter_options(&self) -> impl Future<Output = Result<FilterOptions, HearthbookError>> + Send;
}
