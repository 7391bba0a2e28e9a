//! JSON REST handlers for the sales report.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use serde::Deserialize;

use hearthbook_app::ports::RecordRepository;
use hearthbook_domain::filter::RecordFilter;
use hearthbook_domain::page::Page;
use hearthbook_domain::record::Record;
use hearthbook_domain::sales::SalesSummary;

use super::{ListQuery, present};
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the summary endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SummaryQuery {
    pub zone: Option<String>,
    pub sold_by: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Possible responses from the sales record listing.
pub enum RecordsResponse {
    Ok(Json<Page<Record>>),
}

impl IntoResponse for RecordsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the summary endpoint.
pub enum SummaryResponse {
    Ok(Json<SalesSummary>),
}

impl IntoResponse for SummaryResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/sales/records`: the filtered records behind a report.
pub async fn records<R>(
    State(state): State<AppState<R>>,
    Query(params): Query<ListQuery>,
) -> Result<RecordsResponse, ApiError>
where
    R: RecordRepository + Send + Sync + 'static,
{
    let page = state
        .record_service
        .list_records(&params.filter(), params.page()?, params.sort()?)
        .await?;
    Ok(RecordsResponse::Ok(Json(page)))
}

/// `GET /api/sales/summary?zone=&sold_by=&date_from=&date_to=`
pub async fn summary<R>(
    State(state): State<AppState<R>>,
    Query(params): Query<SummaryQuery>,
) -> Result<SummaryResponse, ApiError>
where
    R: RecordRepository + Send + Sync + 'static,
{
    let filter = RecordFilter {
        zone: present(params.zone.as_ref()),
        sold_by: present(params.sold_by.as_ref()),
        date_from: params.date_from,
        date_to: params.date_to,
        ..RecordFilter::default()
    };
    let summary = state.sales_service.summary(&filter).await?;
    Ok(SummaryResponse::Ok(Json(summary)))
}
