//! JSON REST handler for filter choices.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use hearthbook_app::ports::RecordRepository;
use hearthbook_domain::filter::FilterOptions;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the options endpoint.
pub enum OptionsResponse {
    Ok(Json<FilterOptions>),
}

impl IntoResponse for OptionsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/filters/options`
pub async fn options<R>(State(state): State<AppState<R>>) -> Result<OptionsResponse, ApiError>
where
    R: RecordRepository + Send + Sync + 'static,
{
    let options = state.record_service.filter_options().await?;
    Ok(OptionsResponse::Ok(Json(options)))
}
