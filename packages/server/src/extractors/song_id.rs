use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;

/// Song identifier taken from the `{id}` path segment.
///
/// A segment that is not a UUID is rejected with `AppError::Validation`
/// before the handler runs.
#[derive(Debug, Clone, Copy)]
pub struct SongId(pub Uuid);

impl<S> FromRequestParts<S> for SongId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        Uuid::parse_str(&raw)
            .map(SongId)
            .map_err(|_| AppError::Validation(format!("Invalid song ID '{raw}'")))
    }
}
