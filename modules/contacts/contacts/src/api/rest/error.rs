use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use axum::Json;
use contacts_sdk::ContactsError;

use super::dto::ErrorDto;
use crate::domain::error::DomainError;
use crate::errors::ErrorCode;

/// Handler error: a public `ContactsError` rendered through the error catalog.
#[derive(Debug)]
pub struct ApiError(pub ContactsError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        if e.is_storage() {
            // Details stay in the log; the client sees a generic storage failure.
            tracing::error!(error = %e, "Storage failure while serving request");
        }
        Self(e.into())
    }
}

impl From<ContactsError> for ApiError {
    fn from(e: ContactsError) -> Self {
        Self(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ContactsError::invalid_request(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(ContactsError::invalid_request(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(ContactsError::invalid_request(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = ErrorCode::from(&self.0);
        let body = ErrorDto {
            success: false,
            error: self.0.to_string(),
            error_code: code.code(),
            kind: code.kind().to_owned(),
        };
        (code.status(), Json(body)).into_response()
    }
}
