use axum::Json;
use axum::extract::multipart::Field;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::extractors::song_id::SongId;
use crate::models::song::{AlbumArtResponse, CreateSongRequest, SongResponse};
use crate::services::AlbumArtUpload;
use crate::state::AppState;

/// Multipart overhead allowed on top of the configured file size limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn album_art_body_limit(max_file_size: u64) -> DefaultBodyLimit {
    let max = usize::try_from(max_file_size).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(max.saturating_add(MULTIPART_OVERHEAD))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Songs",
    operation_id = "listSongs",
    summary = "List all songs",
    description = "Returns every song in the library, oldest first.",
    responses(
        (status = 200, description = "List of songs", body = Vec<SongResponse>),
        (status = 500, description = "Storage error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_songs(State(state): State<AppState>) -> Result<Json<Vec<SongResponse>>, AppError> {
    let songs = state.songs.list_songs().await?;
    Ok(Json(songs.into_iter().map(SongResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Songs",
    operation_id = "createSong",
    summary = "Create a new song",
    description = "Creates a song. `title`, `artist`, `album` and `genre` are required and must \
        be 1-256 characters after trimming. The ID is assigned by the server.",
    request_body = CreateSongRequest,
    responses(
        (status = 201, description = "Song created", body = SongResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(title = %payload.title))]
pub async fn create_song(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSongRequest>,
) -> Result<impl IntoResponse, AppError> {
    let song = state.songs.create_song(payload.into()).await?;
    let location = format!("/api/v1/songs/{}", song.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(SongResponse::from(song)),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Songs",
    operation_id = "getSong",
    summary = "Get a song by ID",
    params(("id" = String, Path, description = "Song ID (UUID)")),
    responses(
        (status = 200, description = "Song details", body = SongResponse),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Song not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip_all, fields(song_id = %id))]
pub async fn get_song(
    State(state): State<AppState>,
    SongId(id): SongId,
) -> Result<Json<SongResponse>, AppError> {
    let song = state.songs.get_song(id).await?;
    Ok(Json(song.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Songs",
    operation_id = "deleteSong",
    summary = "Delete a song",
    description = "Deletes the song record, then its album art file. A failure to remove the \
        file is logged and does not fail the request.",
    params(("id" = String, Path, description = "Song ID (UUID)")),
    responses(
        (status = 200, description = "Song deleted"),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Song not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Storage error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip_all, fields(song_id = %id))]
pub async fn delete_song(
    State(state): State<AppState>,
    SongId(id): SongId,
) -> Result<StatusCode, AppError> {
    state.songs.delete_song(id).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/{id}/album-art",
    tag = "Songs",
    operation_id = "uploadAlbumArt",
    summary = "Upload or replace the album art of a song",
    description = "Stores the `file` multipart field as the song's album art. The new file is \
        saved before the song points at it; any previous art is deleted afterwards.",
    params(("id" = String, Path, description = "Song ID (UUID)")),
    request_body(content_type = "multipart/form-data", description = "Image upload in the `file` field"),
    responses(
        (status = 200, description = "Album art stored", body = AlbumArtResponse),
        (status = 400, description = "No file, empty file, or file too large (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Song not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Concurrent modification (CONFLICT)", body = ErrorBody),
        (status = 500, description = "Storage error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip_all, fields(song_id = %id))]
pub async fn upload_album_art(
    State(state): State<AppState>,
    SongId(id): SongId,
    mut multipart: Multipart,
) -> Result<Json<AlbumArtResponse>, AppError> {
    // Unknown songs are rejected before the upload body is read.
    state.songs.get_song(id).await?;

    let max_size = state.config.storage.max_file_size;
    let mut upload = AlbumArtUpload {
        file_name: String::new(),
        content: Vec::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("file") {
            upload.file_name = field.file_name().unwrap_or_default().to_string();
            upload.content = read_field(field, max_size).await?;
        }
    }

    let reference = state.songs.upload_album_art(id, upload).await?;

    Ok(Json(AlbumArtResponse {
        album_art_url: reference.into_string(),
    }))
}

/// Buffer a multipart field, enforcing the size limit while reading.
async fn read_field(mut field: Field<'_>, max_size: u64) -> Result<Vec<u8>, AppError> {
    let mut buf = Vec::new();

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        if (buf.len() + chunk.len()) as u64 > max_size {
            return Err(AppError::Validation(format!(
                "File exceeds maximum size of {max_size} bytes"
            )));
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(buf)
}
