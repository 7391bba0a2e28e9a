//! Shared application state for axum handlers.

use std::sync::Arc;

use hearthbook_app::ports::RecordRepository;
use hearthbook_app::services::record_service::RecordService;
use hearthbook_app::services::sales_service::SalesService;
use hearthbook_app::services::warranty_service::WarrantyService;
use hearthbook_domain::warranty::DEFAULT_EXPIRING_SOON_DAYS;

/// Application state shared across all axum handlers.
///
/// Generic over the repository type to avoid dynamic dispatch.
/// `Clone` is implemented manually so the repository itself does not
/// need to be `Clone`: only the `Arc` wrappers are cloned.
pub struct AppState<R> {
    /// Record CRUD and listing service.
    pub record_service: Arc<RecordService<R>>,
    /// Sales report service.
    pub sales_service: Arc<SalesService<R>>,
    /// Warranty queries.
    pub warranty_service: Arc<WarrantyService<R>>,
    /// Expiring-soon window used when a request does not name one.
    pub expiring_soon_days: u32,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            record_service: Arc::clone(&self.record_service),
            sales_service: Arc::clone(&self.sales_service),
            warranty_service: Arc::clone(&self.warranty_service),
            expiring_soon_days: self.expiring_soon_days,
        }
    }
}

impl<R> AppState<R>
where
    R: RecordRepository + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        record_service: RecordService<R>,
        sales_service: SalesService<R>,
        warranty_service: WarrantyService<R>,
    ) -> Self {
        Self {
            record_service: Arc::new(record_service),
            sales_service: Arc::new(sales_service),
            warranty_service: Arc::new(warranty_service),
            expiring_soon_days: DEFAULT_EXPIRING_SOON_DAYS,
        }
    }

    /// Override the default expiring-soon window.
    #[must_use]
    pub fn with_expiring_soon_days(mut self, days: u32) -> Self {
        self.expiring_soon_days = days;
        self
    }
}
