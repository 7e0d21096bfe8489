use std::sync::Arc;

use common::storage::{FileRef, FileStore, StorageError};
use tracing::{Span, debug, info, instrument, warn};
use uuid::Uuid;

use super::error::SongError;
use crate::entity::song;
use crate::repository::{NewSong, SongRepository};

/// How many times an album-art swap is retried when another writer changed
/// the reference between our read and our update.
const MAX_SWAP_ATTEMPTS: u32 = 5;

/// Longest accepted text field, in characters.
const MAX_FIELD_LEN: usize = 256;

/// Song metadata as submitted by a client.
#[derive(Debug, Clone)]
pub struct SongInput {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
}

/// An uploaded album-art file.
#[derive(Debug, Clone)]
pub struct AlbumArtUpload {
    /// Client-side file name; only its extension is kept.
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Song and album-art lifecycle over a [`SongRepository`] and a [`FileStore`].
///
/// Ordering rules keep references valid: a new file is saved before the record
/// points at it, and an old file is deleted only after the record stopped
/// pointing at it. A failure can orphan a file on disk but never leaves a
/// record referencing a missing file.
#[derive(Clone)]
pub struct SongService {
    repo: Arc<dyn SongRepository>,
    files: Arc<dyn FileStore>,
    span: Span,
}

impl SongService {
    pub fn new(repo: Arc<dyn SongRepository>, files: Arc<dyn FileStore>, span: Span) -> Self {
        Self { repo, files, span }
    }

    #[instrument(parent = &self.span, skip_all)]
    pub async fn list_songs(&self) -> Result<Vec<song::Model>, SongError> {
        let songs = self.repo.list().await?;
        debug!(count = songs.len(), "Retrieved songs");
        Ok(songs)
    }

    #[instrument(parent = &self.span, skip_all, fields(song_id = %id))]
    pub async fn get_song(&self, id: Uuid) -> Result<song::Model, SongError> {
        Ok(self.repo.find_by_id(id).await?)
    }

    #[instrument(parent = &self.span, skip_all, fields(title = %input.title))]
    pub async fn create_song(&self, input: SongInput) -> Result<song::Model, SongError> {
        let new_song = validate_song_input(input).inspect_err(|e| {
            warn!(error = %e, "Rejected song");
        })?;

        let song = self.repo.create(new_song).await?;
        info!(song_id = %song.id, "Song created");
        Ok(song)
    }

    /// Attach or replace the album art of a song, returning the new reference.
    #[instrument(
        parent = &self.span,
        skip_all,
        fields(song_id = %id, file_name = %upload.file_name, size = upload.content.len())
    )]
    pub async fn upload_album_art(
        &self,
        id: Uuid,
        upload: AlbumArtUpload,
    ) -> Result<FileRef, SongError> {
        let mut song = self.repo.find_by_id(id).await?;

        if upload.content.is_empty() {
            warn!("No file uploaded");
            return Err(SongError::Validation("No file uploaded".into()));
        }

        let new_ref = self
            .files
            .save(&upload.content, &upload.file_name)
            .await
            .map_err(|e| match e {
                StorageError::EmptyContent | StorageError::SizeLimitExceeded { .. } => {
                    SongError::Validation(e.to_string())
                }
                other => SongError::StorageWrite(other),
            })?;

        let mut attempt = 1;
        let displaced = loop {
            let expected = song.album_art_url.clone();
            match self
                .repo
                .swap_album_art(id, expected.as_deref(), new_ref.as_str())
                .await
            {
                Ok(true) => break expected,
                Ok(false) => {}
                Err(e) => {
                    self.discard(new_ref.as_str()).await;
                    return Err(e.into());
                }
            }

            if attempt >= MAX_SWAP_ATTEMPTS {
                self.discard(new_ref.as_str()).await;
                return Err(SongError::ConcurrentModification(id));
            }
            attempt += 1;

            song = match self.repo.find_by_id(id).await {
                Ok(song) => song,
                Err(e) => {
                    self.discard(new_ref.as_str()).await;
                    return Err(e.into());
                }
            };
            debug!(attempt, "Album art changed concurrently, retrying swap");
        };

        if let Some(old) = displaced {
            self.discard(&old).await;
        }

        info!(album_art_url = %new_ref, "Album art uploaded");
        Ok(new_ref)
    }

    /// Delete a song, then the album art it referenced.
    #[instrument(parent = &self.span, skip_all, fields(song_id = %id))]
    pub async fn delete_song(&self, id: Uuid) -> Result<(), SongError> {
        let song = self.repo.find_by_id(id).await?;

        self.repo.delete(id).await?;

        if let Some(url) = song.album_art_url.as_deref() {
            self.discard(url).await;
        }

        info!("Song deleted");
        Ok(())
    }

    async fn delete_file(&self, raw: &str) -> Result<bool, SongError> {
        let reference = FileRef::parse(raw).map_err(SongError::StorageDelete)?;
        self.files
            .delete(&reference)
            .await
            .map_err(SongError::StorageDelete)
    }

    /// Delete a file no record points at any more. Failures leave an orphaned
    /// file behind and are only logged.
    async fn discard(&self, raw: &str) {
        if let Err(e) = self.delete_file(raw).await {
            warn!(file = raw, error = %e, "Leaving orphaned file");
        }
    }
}

fn validate_field(name: &str, value: String) -> Result<String, SongError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_FIELD_LEN {
        return Err(SongError::Validation(format!(
            "{name} must be 1-{MAX_FIELD_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_song_input(input: SongInput) -> Result<NewSong, SongError> {
    Ok(NewSong {
        id: None,
        title: validate_field("Title", input.title)?,
        artist: validate_field("Artist", input.artist)?,
        album: validate_field("Album", input.album)?,
        genre: validate_field("Genre", input.genre)?,
    })
}
