//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod filters;
#[allow(clippy::missing_errors_doc)]
pub mod records;
#[allow(clippy::missing_errors_doc)]
pub mod sales;
#[allow(clippy::missing_errors_doc)]
pub mod warranty;

use std::str::FromStr;

use axum::Router;
use axum::routing::get;
use chrono::NaiveDate;
use serde::Deserialize;

use hearthbook_app::ports::RecordRepository;
use hearthbook_domain::error::ValidationError;
use hearthbook_domain::filter::RecordFilter;
use hearthbook_domain::id::RecordId;
use hearthbook_domain::page::{DEFAULT_PAGE_SIZE, PageRequest, Sort, SortField};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R>() -> Router<AppState<R>>
where
    R: RecordRepository + Send + Sync + 'static,
{
    Router::new()
        // Records
        .route(
            "/records",
            get(records::list::<R>).post(records::create::<R>),
        )
        .route(
            "/records/{id}",
            get(records::get::<R>)
                .patch(records::update::<R>)
                .delete(records::delete::<R>),
        )
        .route("/records/history/{phone}", get(records::history::<R>))
        // Warranty
        .route("/records/warranty/summary", get(warranty::summary::<R>))
        .route(
            "/records/warranty/out-of-warranty",
            get(warranty::out_of_warranty::<R>),
        )
        .route(
            "/records/warranty/expiring-soon",
            get(warranty::expiring_soon::<R>),
        )
        // Sales
        .route("/sales/records", get(sales::records::<R>))
        .route("/sales/summary", get(sales::summary::<R>))
        // Filters
        .route("/filters/options", get(filters::options::<R>))
}

/// Parse a record id from a path or query segment.
fn parse_id(value: &str) -> Result<RecordId, ApiError> {
    RecordId::from_str(value).map_err(|_| ValidationError::InvalidId(value.to_owned()).into())
}

/// Blank query values (as sent by empty form fields) mean "no criterion".
fn present(value: Option<&String>) -> Option<String> {
    value
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Page window query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageQuery {
    fn to_request(&self) -> Result<PageRequest, ApiError> {
        Ok(PageRequest::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?)
    }
}

/// Query parameters shared by the record listings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
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
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    /// Column to sort by. Defaults to the delivery date.
    pub sort_by: Option<String>,
    /// Descending unless `false`.
    pub sort_desc: Option<bool>,
}

impl ListQuery {
    fn filter(&self) -> RecordFilter {
        RecordFilter {
            search: present(self.search.as_ref()),
            zone: present(self.zone.as_ref()),
            capacity_kw: present(self.capacity_kw.as_ref()),
            heater: present(self.heater.as_ref()),
            controller: present(self.controller.as_ref()),
            card: present(self.card.as_ref()),
            body: present(self.body.as_ref()),
            sold_by: present(self.sold_by.as_ref()),
            lead_source: present(self.lead_source.as_ref()),
            date_from: self.date_from,
            date_to: self.date_to,
        }
    }

    fn page(&self) -> Result<PageRequest, ApiError> {
        PageQuery {
            page: self.page,
            page_size: self.page_size,
        }
        .to_request()
    }

    fn sort(&self) -> Result<Sort, ApiError> {
        let field = match present(self.sort_by.as_ref()) {
            Some(name) => SortField::from_str(&name)?,
            None => SortField::default(),
        };
        Ok(Sort {
            field,
            descending: self.sort_desc.unwrap_or(true),
        })
    }
}
