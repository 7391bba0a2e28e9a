//! In-memory [`RecordRepository`] shared by the service tests.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Mutex;

use hearthbook_domain::error::HearthbookError;
use hearthbook_domain::filter::{FilterOptions, RecordFilter};
use hearthbook_domain::id::RecordId;
use hearthbook_domain::page::{PageRequest, Sort, SortField};
use hearthbook_domain::record::{REFERENCE_PREFIX, Record};
use hearthbook_domain::sales::OrderRecord;

use crate::ports::RecordRepository;

/// Records kept in insertion order.
#[derive(Default)]
pub struct InMemoryRecordRepo {
    store: Mutex<Vec<Record>>,
}

impl InMemoryRecordRepo {
    pub fn with(records: Vec<Record>) -> Self {
        Self {
            store: Mutex::new(records),
        }
    }

    fn matching(&self, filter: &RecordFilter) -> Vec<Record> {
        let store = self.store.lock().unwrap();
        store
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect()
    }
}

fn compare(field: SortField, a: &Record, b: &Record) -> Ordering {
    match field {
        SortField::DeliveredOn => a.delivered_on.cmp(&b.delivered_on),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::Reference => a.reference.cmp(&b.reference),
        SortField::ClientName => a.client_name.cmp(&b.client_name),
        SortField::SalePrice => a
            .sale_price
            .partial_cmp(&b.sale_price)
            .unwrap_or(Ordering::Equal),
    }
}

fn distinct(records: &[Record], label: impl Fn(&Record) -> Option<&String>) -> Vec<String> {
    records
        .iter()
        .filter_map(label)
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

impl RecordRepository for InMemoryRecordRepo {
    async fn create(&self, record: Record) -> Result<Record, HearthbookError> {
        self.store.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn get_by_id(&self, id: RecordId) -> Result<Option<Record>, HearthbookError> {
        let store = self.store.lock().unwrap();
        Ok(store.iter().find(|record| record.id == id).cloned())
    }

    async fn update(&self, record: Record) -> Result<Record, HearthbookError> {
        let mut store = self.store.lock().unwrap();
        if let Some(slot) = store.iter_mut().find(|stored| stored.id == record.id) {
            *slot = record.clone();
        }
        Ok(record)
    }

    async fn delete(&self, id: RecordId) -> Result<bool, HearthbookError> {
        let mut store = self.store.lock().unwrap();
        let before = store.len();
        store.retain(|record| record.id != id);
        Ok(store.len() != before)
    }

    async fn last_reference(&self) -> Result<Option<String>, HearthbookError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .iter()
            .map(|record| &record.reference)
            .filter_map(|reference| {
                let number = reference.strip_prefix(REFERENCE_PREFIX)?;
                Some((number.parse::<u64>().unwrap_or(0), reference))
            })
            .max()
            .map(|(_, reference)| reference.clone()))
    }

    async fn list(
        &self,
        filter: &RecordFilter,
        page: PageRequest,
        sort: Sort,
    ) -> Result<(Vec<Record>, u64), HearthbookError> {
        let mut records = self.matching(filter);
        records.sort_by(|a, b| {
            let ordering = compare(sort.field, a, b);
            if sort.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        let total = records.len() as u64;
        let records = records
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap())
            .take(usize::try_from(page.limit()).unwrap())
            .collect();
        Ok((records, total))
    }

    async fn fetch_filtered(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<OrderRecord>, HearthbookError> {
        Ok(self.matching(filter).iter().map(OrderRecord::from).collect())
    }

    async fn find_by_client_phone(
        &self,
        phone: &str,
        exclude: Option<RecordId>,
        limit: u32,
    ) -> Result<Vec<Record>, HearthbookError> {
        let store = self.store.lock().unwrap();
        let mut records: Vec<Record> = store
            .iter()
            .filter(|record| record.client_phone.as_deref() == Some(phone))
            .filter(|record| Some(record.id) != exclude)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.delivered_on.cmp(&a.delivered_on));
        records.truncate(limit as usize);
        Ok(records)
    }

    async fn filter_options(&self) -> Result<FilterOptions, HearthbookError> {
        let store = self.store.lock().unwrap();
        Ok(FilterOptions {
            zones: distinct(&store, |r| r.zone.as_ref()),
            capacity_kw: distinct(&store, |r| r.capacity_kw.as_ref()),
            heaters: distinct(&store, |r| r.heater.as_ref()),
            controllers: distinct(&store, |r| r.controller.as_ref()),
            cards: distinct(&store, |r| r.card.as_ref()),
            bodies: distinct(&store, |r| r.body.as_ref()),
            sold_by: distinct(&store, |r| r.sold_by.as_ref()),
            lead_sources: distinct(&store, |r| r.lead_source.as_ref()),
        })
    }
}
