mod song;

use async_trait::async_trait;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

use crate::entity::song as song_entity;

pub use song::SeaOrmSongRepository;

/// A song record ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    /// Caller-chosen identifier. Assigned by the repository when `None`.
    pub id: Option<Uuid>,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Song {0} not found")]
    NotFound(Uuid),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Database error: {0}")]
    Database(DbErr),
}

impl From<DbErr> for RepositoryError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail))
            | Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                RepositoryError::ConstraintViolation(detail)
            }
            _ => RepositoryError::Database(err),
        }
    }
}

/// Persisted song records. Every call is a single atomic statement.
#[async_trait]
pub trait SongRepository: Send + Sync {
    async fn create(&self, song: NewSong) -> Result<song_entity::Model, RepositoryError>;

    /// All songs, oldest first.
    async fn list(&self) -> Result<Vec<song_entity::Model>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<song_entity::Model, RepositoryError>;

    /// Set the album-art reference to `new` if the song exists and its current
    /// reference is still `expected`. Returns whether the row changed.
    async fn swap_album_art(
        &self,
        id: Uuid,
        expected: Option<&str>,
        new: &str,
    ) -> Result<bool, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}
