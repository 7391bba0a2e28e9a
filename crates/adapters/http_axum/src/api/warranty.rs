//! JSON REST handlers for warranty queries.
//!
//! "Today" is the server's current UTC date.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use hearthbook_app::ports::RecordRepository;
use hearthbook_domain::page::Page;
use hearthbook_domain::record::Record;
use hearthbook_domain::time::today;
use hearthbook_domain::warranty::WarrantySummary;

use super::PageQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters carrying an optional expiring-soon window.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WindowQuery {
    pub days: Option<u32>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl WindowQuery {
    fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Possible responses from the summary endpoint.
pub enum SummaryResponse {
    Ok(Json<WarrantySummary>),
}

impl IntoResponse for SummaryResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the warranty listings.
pub enum ListResponse {
    Ok(Json<Page<Record>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/records/warranty/summary?days=`
pub async fn summary<R>(
    State(state): State<AppState<R>>,
    Query(params): Query<WindowQuery>,
) -> Result<SummaryResponse, ApiError>
where
    R: RecordRepository + Send + Sync + 'static,
{
    let days = params.days.unwrap_or(state.expiring_soon_days);
    let summary = state.warranty_service.summary(today(), days).await?;
    Ok(SummaryResponse::Ok(Json(summary)))
}

/// `GET /api/records/warranty/out-of-warranty?page=&page_size=`
pub async fn out_of_warranty<R>(
    State(state): State<AppState<R>>,
    Query(params): Query<PageQuery>,
) -> Result<ListResponse, ApiError>
where
    R: RecordRepository + Send + Sync + 'static,
{
    let page = state
        .warranty_service
        .out_of_warranty(today(), params.to_request()?)
        .await?;
    Ok(ListResponse::Ok(Json(page)))
}

/// `GET /api/records/warranty/expiring-soon?days=&page=&page_size=`
pub async fn expiring_soon<R>(
    State(state): State<AppState<R>>,
    Query(params): Query<WindowQuery>,
) -> Result<ListResponse, ApiError>
where
    R: RecordRepository + Send + Sync + 'static,
{
    let days = params.days.unwrap_or(state.expiring_soon_days);
    let page = state
        .warranty_service
        .expiring_soon(today(), days, params.page_query().to_request()?)
        .await?;
    Ok(ListResponse::Ok(Json(page)))
}
