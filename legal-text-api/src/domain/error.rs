use thiserror::Error;

use super::models::CollectionId;

/// Errors that can occur during library operations.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("no legal text named '{0}'")]
    NotFound(CollectionId),
    #[error("{0}")]
    Validation(String),
    #[error("this legal text does not have that many articles (index {index}, {count} articles)")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("'{0}' is not editable, make it editable in settings first")]
    NotEditable(CollectionId),
    #[error("document store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("document store error: {0}")]
    Store(String),
}

impl LibraryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

impl From<sqlx::Error> for LibraryError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                LibraryError::StoreUnavailable(e.to_string())
            }
            other => LibraryError::Store(other.to_string()),
        }
    }
}
