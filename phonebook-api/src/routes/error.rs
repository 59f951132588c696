use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use crate::domain::ContactError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationFailed,
    MalformedRequest,
    NotFound,
    MissingAvatar,
    UnsupportedMediaType,
    InvalidImage,
    PayloadTooLarge,
    InternalError,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
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
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message).with_code(ErrorCode::InternalError)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message).with_code(ErrorCode::NotFound)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::bad_request(message).with_code(ErrorCode::MalformedRequest)
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
            message: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ContactError> for ApiError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::Validation(message) => {
                Self::bad_request(message).with_code(ErrorCode::ValidationFailed)
            }
            ContactError::NotFound(_) => Self::not_found(err.to_string()),
            ContactError::MissingAvatar => {
                Self::bad_request(err.to_string()).with_code(ErrorCode::MissingAvatar)
            }
            ContactError::UnsupportedMediaType(_) => {
                Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, err.to_string())
                    .with_code(ErrorCode::UnsupportedMediaType)
            }
            ContactError::InvalidImage => {
                Self::bad_request(err.to_string()).with_code(ErrorCode::InvalidImage)
            }
            ContactError::PayloadTooLarge => {
                Self::new(StatusCode::PAYLOAD_TOO_LARGE, err.to_string())
                    .with_code(ErrorCode::PayloadTooLarge)
            }
            ContactError::Storage(message) => {
                tracing::error!("Database error: {}", message);
                Self::internal("storage operation failed")
            }
            ContactError::Filesystem(message) => {
                tracing::error!("Avatar file operation failed: {}", message);
                Self::internal("avatar file operation failed")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text()).with_code(ErrorCode::MalformedRequest)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::malformed(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::malformed(rejection.body_text())
    }
}
