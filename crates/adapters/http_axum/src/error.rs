//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use hearthbook_domain::error::{HearthbookError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`HearthbookError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(HearthbookError);

impl From<HearthbookError> for ApiError {
    fn from(err: HearthbookError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            HearthbookError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            HearthbookError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            HearthbookError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearthbook_domain::error::NotFoundError;

    #[test]
    fn should_map_validation_to_bad_request() {
        let response = ApiError::from(ValidationError::EmptyClientName).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn should_map_not_found_to_404() {
        let err = HearthbookError::from(NotFoundError {
            entity: "Record",
            id: "x".to_string(),
        });
        assert_eq!(
            ApiError::from(err).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn should_hide_storage_details_behind_500() {
        let err = HearthbookError::Storage(Box::new(std::io::Error::other("disk on fire")));
        assert_eq!(
            ApiError::from(err).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
