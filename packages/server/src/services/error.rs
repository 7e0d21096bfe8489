use common::storage::StorageError;
use thiserror::Error;
use uuid::Uuid;

use crate::repository::RepositoryError;

#[derive(Debug, Error)]
pub enum SongError {
    #[error("{0}")]
    Validation(String),

    #[error("Song {0} not found")]
    NotFound(Uuid),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Failed to store file: {0}")]
    StorageWrite(StorageError),

    #[error("Failed to delete file: {0}")]
    StorageDelete(StorageError),

    #[error("Song {0} was modified concurrently")]
    ConcurrentModification(Uuid),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<RepositoryError> for SongError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => SongError::NotFound(id),
            RepositoryError::ConstraintViolation(detail) => SongError::ConstraintViolation(detail),
            RepositoryError::Database(e) => SongError::Unexpected(e.to_string()),
        }
    }
}
