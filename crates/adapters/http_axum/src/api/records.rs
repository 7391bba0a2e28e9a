//! JSON REST handlers for records.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use hearthbook_app::ports::RecordRepository;
use hearthbook_app::services::record_service::DEFAULT_HISTORY_LIMIT;
use hearthbook_domain::page::Page;
use hearthbook_domain::record::{Record, RecordDraft, RecordPatch};

use super::{ListQuery, parse_id};
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the client history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Record to leave out, typically the one being viewed.
    pub exclude_id: Option<String>,
    /// Maximum number of records. Defaults to 10.
    pub limit: Option<u32>,
}

/// Possible responses from the list endpoint.
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

/// Possible responses from the get and update endpoints.
pub enum GetResponse {
    Ok(Json<Record>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Record>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Possible responses from the history endpoint.
pub enum HistoryResponse {
    Ok(Json<Vec<Record>>),
}

impl IntoResponse for HistoryResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/records?search=&zone=&…&page=&page_size=&sort_by=&sort_desc=`
pub async fn list<R>(
    State(state): State<AppState<R>>,
    Query(params): Query<ListQuery>,
) -> Result<ListResponse, ApiError>
where
    R: RecordRepository + Send + Sync + 'static,
{
    let page = state
        .record_service
        .list_records(&params.filter(), params.page()?, params.sort()?)
        .await?;
    Ok(ListResponse::Ok(Json(page)))
}

/// `GET /api/records/:id`
pub async fn get<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: RecordRepository + Send + Sync + 'static,
{
    let record = state.record_service.get_record(parse_id(&id)?).await?;
    Ok(GetResponse::Ok(Json(record)))
}

/// `POST /api/records`
pub async fn create<R>(
    State(state): State<AppState<R>>,
    Json(draft): Json<RecordDraft>,
) -> Result<CreateResponse, ApiError>
where
    R: RecordRepository + Send + Sync + 'static,
{
    let created = state.record_service.create_record(draft).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PATCH /api/records/:id`
pub async fn update<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Json(patch): Json<RecordPatch>,
) -> Result<GetResponse, ApiError>
where
    R: RecordRepository + Send + Sync + 'static,
{
    let updated = state
        .record_service
        .update_record(parse_id(&id)?, patch)
        .await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /api/records/:id`
pub async fn delete<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    R: RecordRepository + Send + Sync + 'static,
{
    state.record_service.delete_record(parse_id(&id)?).await?;
    Ok(DeleteResponse::NoContent)
}

/// `GET /api/records/history/:phone?exclude_id=&limit=`
pub async fn history<R>(
    State(state): State<AppState<R>>,
    Path(phone): Path<String>,
    Query(params): Query<HistoryQuery>,
) -> Result<HistoryResponse, ApiError>
where
    R: RecordRepository + Send + Sync + 'static,
{
    let exclude = params.exclude_id.as_deref().map(parse_id).transpose()?;
    let records = state
        .record_service
        .client_history(
            &phone,
            exclude,
            params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
        )
        .await?;
    Ok(HistoryResponse::Ok(Json(records)))
}
