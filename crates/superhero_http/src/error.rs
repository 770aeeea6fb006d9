//! Mapping from core errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Serialize;
use std::collections::BTreeMap;
use superhero_core::{RepoError, ServiceError};

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    /// Field → reason, present for validation failures only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

/// Handler error carrying the status code and body to send.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                message: message.into(),
                errors: None,
            },
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        error!("event=http_error module=http status=error error_code=internal error={message}");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Validation(failures) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                body: ErrorResponse {
                    message: "The given data was invalid.".to_string(),
                    errors: Some(
                        failures
                            .errors()
                            .iter()
                            .map(|(field, reason)| (field.to_string(), reason.clone()))
                            .collect(),
                    ),
                },
            },
            ServiceError::NotFound(id) => {
                Self::new(StatusCode::NOT_FOUND, format!("Superhero {id} not found."))
            }
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        ServiceError::from(value).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::StatusCode;
    use superhero_core::{validate_input, RepoError, ServiceError, SuperheroInput};

    #[test]
    fn validation_maps_to_unprocessable_entity_with_fields() {
        let failures = validate_input(SuperheroInput::default()).unwrap_err();
        let api = ApiError::from(ServiceError::Validation(failures));
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        let errors = api.body.errors.expect("field errors should be present");
        assert!(errors.contains_key("real_name"));
        assert!(errors.contains_key("hero_name"));
    }

    #[test]
    fn not_found_maps_to_404_and_storage_to_500() {
        assert_eq!(
            ApiError::from(ServiceError::NotFound(3)).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::from(RepoError::NotFound(3)).status, StatusCode::NOT_FOUND);
        let internal = ApiError::from(RepoError::InvalidData("bad row".to_string()));
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.body.message, "Internal server error.");
    }
}
