use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use common::storage::FileRef;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Stream a stored album-art file. File names are unique per upload, so the
/// response may be cached indefinitely.
#[instrument(skip(state))]
pub async fn serve_album_art(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response, AppError> {
    let dir = state.config.storage.album_art_dir.trim_matches('/');
    let reference = FileRef::parse(&format!("/{dir}/{file_name}"))?;

    let reader = state.files.get_stream(&reference).await?;
    let mime = mime_guess::from_path(reference.file_name()).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(Body::from_stream(ReaderStream::new(reader)))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
