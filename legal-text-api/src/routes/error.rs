use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use crate::domain::LibraryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BookNotFound,
    ArticleNotFound,
    BookNotEditable,
    StoreUnavailable,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<ErrorCode>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: Option<ErrorCode>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<LibraryError> for ApiError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::NotFound(_) => {
                Self::not_found(err.to_string()).with_code(ErrorCode::BookNotFound)
            }
            LibraryError::IndexOutOfRange { .. } => {
                Self::not_found(err.to_string()).with_code(ErrorCode::ArticleNotFound)
            }
            LibraryError::Validation(_) => Self::bad_request(err.to_string()),
            LibraryError::NotEditable(_) => {
                Self::forbidden(err.to_string()).with_code(ErrorCode::BookNotEditable)
            }
            LibraryError::StoreUnavailable(ref e) => {
                tracing::warn!("Store unavailable: {}", e);
                Self::unavailable("Library store is unavailable, try again later")
                    .with_code(ErrorCode::StoreUnavailable)
            }
            LibraryError::Store(ref e) => {
                tracing::error!("Store error: {}", e);
                Self::internal("Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::CollectionId;

    #[test]
    fn library_errors_map_to_statuses() {
        let id = CollectionId::new("demo");
        let cases = [
            (LibraryError::NotFound(id.clone()), StatusCode::NOT_FOUND),
            (
                LibraryError::IndexOutOfRange { index: 3, count: 2 },
                StatusCode::NOT_FOUND,
            ),
            (LibraryError::validation("bad"), StatusCode::BAD_REQUEST),
            (LibraryError::NotEditable(id), StatusCode::FORBIDDEN),
            (
                LibraryError::StoreUnavailable("down".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                LibraryError::Store("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn store_errors_hide_details() {
        let err = ApiError::from(LibraryError::Store("password=hunter2".into()));
        assert!(!err.to_string().contains("hunter2"));
    }
}
