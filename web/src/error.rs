use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use domain::error::{
    AccessErrorKind, DomainErrorKind, EntityErrorKind, Error as DomainError, InternalErrorKind,
    StateErrorKind,
};
use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl Error {
    /// The status, machine readable code and client message for this error.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match &self.0.error_kind {
            DomainErrorKind::Access(AccessErrorKind::Unauthenticated) => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication required".to_string(),
            ),
            DomainErrorKind::Access(AccessErrorKind::Forbidden) => (
                StatusCode::FORBIDDEN,
                "forbidden",
                "Access denied".to_string(),
            ),
            DomainErrorKind::NotFound(message) => {
                (StatusCode::NOT_FOUND, "not_found", message.clone())
            }
            DomainErrorKind::State(StateErrorKind::Conflict(message)) => {
                (StatusCode::BAD_REQUEST, "conflict", message.clone())
            }
            DomainErrorKind::State(StateErrorKind::InvalidState(message)) => {
                (StatusCode::BAD_REQUEST, "invalid_state", message.clone())
            }
            DomainErrorKind::Invalid(message) => {
                (StatusCode::BAD_REQUEST, "invalid", message.clone())
            }
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Invalid)) => (
                StatusCode::BAD_REQUEST,
                "invalid",
                "Invalid request".to_string(),
            ),
            DomainErrorKind::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "Internal server error".to_string(),
            ),
        }
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            error!("{code}: {:?}", self.0);
        } else {
            debug!("{code}: {message}");
        }

        (status, Json(json!({ "message": message, "code": code }))).into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
