//! Record service: use-cases for managing service/sales records.

use hearthbook_domain::error::{HearthbookError, NotFoundError, ValidationError};
use hearthbook_domain::filter::{FilterOptions, RecordFilter};
use hearthbook_domain::id::RecordId;
use hearthbook_domain::page::{Page, PageRequest, Sort};
use hearthbook_domain::record::{Record, RecordDraft, RecordPatch, next_reference};
use hearthbook_domain::time::now;

use crate::ports::RecordRepository;

/// Largest number of records returned by a client history lookup.
pub const MAX_HISTORY_LIMIT: u32 = 50;

/// History length used when the caller does not ask for one.
pub const DEFAULT_HISTORY_LIMIT: u32 = 10;

fn not_found(id: RecordId) -> HearthbookError {
    NotFoundError {
        entity: "Record",
        id: id.to_string(),
    }
    .into()
}

/// Application service for record CRUD and listings.
pub struct RecordService<R> {
    repo: R,
}

impl<R: RecordRepository> RecordService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a record from a draft, allocating the next `RMZ-` reference.
    ///
    /// # Errors
    ///
    /// Returns [`HearthbookError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, draft), fields(client_name = %draft.client_name))]
    pub async fn create_record(&self, draft: RecordDraft) -> Result<Record, HearthbookError> {
        let last = self.repo.last_reference().await?;
        let reference = next_reference(last.as_deref());
        let record = Record::from_draft(RecordId::new(), reference, draft, now());
        record.validate()?;
        let created = self.repo.create(record).await?;
        tracing::info!(reference = %created.reference, "record created");
        Ok(created)
    }

    /// Look up a record by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`HearthbookError::NotFound`] when no record with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_record(&self, id: RecordId) -> Result<Record, HearthbookError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Apply a partial update to an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`HearthbookError::NotFound`] if the record does not exist,
    /// [`HearthbookError::Validation`] if the patched record breaks an
    /// invariant, or a storage error from the repository.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_record(
        &self,
        id: RecordId,
        patch: RecordPatch,
    ) -> Result<Record, HearthbookError> {
        let mut record = self.get_record(id).await?;
        record.apply(patch, now());
        record.validate()?;
        self.repo.update(record).await
    }

    /// Delete a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`HearthbookError::NotFound`] if the record does not exist,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_record(&self, id: RecordId) -> Result<(), HearthbookError> {
        if self.repo.delete(id).await? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// List one page of records matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`HearthbookError::Validation`] for an incoherent filter or
    /// page window, or a storage error from the repository.
    #[tracing::instrument(skip(self, filter))]
    pub async fn list_records(
        &self,
        filter: &RecordFilter,
        page: PageRequest,
        sort: Sort,
    ) -> Result<Page<Record>, HearthbookError> {
        filter.validate()?;
        page.validate()?;
        let (records, total) = self.repo.list(filter, page, sort).await?;
        Ok(Page {
            records,
            total,
            page: page.page,
            page_size: page.page_size,
        })
    }

    /// Previous records for the same client phone, newest delivery first.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidLimit`] unless `limit` is in
    /// `1..=MAX_HISTORY_LIMIT`, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn client_history(
        &self,
        phone: &str,
        exclude: Option<RecordId>,
        limit: u32,
    ) -> Result<Vec<Record>, HearthbookError> {
        if limit == 0 || limit > MAX_HISTORY_LIMIT {
            return Err(ValidationError::InvalidLimit {
                value: limit,
                max: MAX_HISTORY_LIMIT,
            }
            .into());
        }
        self.repo.find_by_client_phone(phone, exclude, limit).await
    }

    /// Distinct values available for each filterable label.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn filter_options(&self) -> Result<FilterOptions, HearthbookError> {
        self.repo.filter_options().await
    }
}
