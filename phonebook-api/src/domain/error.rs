use thiserror::Error;

use crate::domain::models::ContactId;

/// Errors that can occur during contact and avatar operations.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("{0}")]
    Validation(String),
    #[error("contact {0} not found")]
    NotFound(ContactId),
    #[error("no image files were uploaded")]
    MissingAvatar,
    #[error("unsupported avatar type: {0}")]
    UnsupportedMediaType(String),
    #[error("uploaded file is not a valid image of its declared type")]
    InvalidImage,
    #[error("avatar payload exceeds limit")]
    PayloadTooLarge,
    #[error("storage error: {0}")]
    Storage(String),
    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl ContactError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    pub fn filesystem(err: impl std::fmt::Display) -> Self {
        Self::Filesystem(err.to_string())
    }
}
