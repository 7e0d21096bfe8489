use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::song;
use crate::services::SongInput;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateSongRequest {
    #[schema(example = "Blue in Green")]
    pub title: String,
    #[schema(example = "Miles Davis")]
    pub artist: String,
    #[schema(example = "Kind of Blue")]
    pub album: String,
    #[schema(example = "Jazz")]
    pub genre: String,
}

impl From<CreateSongRequest> for SongInput {
    fn from(req: CreateSongRequest) -> Self {
        Self {
            title: req.title,
            artist: req.artist,
            album: req.album,
            genre: req.genre,
        }
    }
}

/// Response DTO for a single song.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SongResponse {
    /// Song ID (UUIDv7).
    #[schema(example = "01936f0e-1234-7abc-8000-000000000001")]
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    /// Public URL of the album art, absent until art is uploaded.
    #[schema(example = "/uploads/albumart/5f0c1c1e-8d1e-4c55-9d47-2f8f4b0c8a11.jpg")]
    pub album_art_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<song::Model> for SongResponse {
    fn from(model: song::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            artist: model.artist,
            album: model.album,
            genre: model.genre,
            album_art_url: model.album_art_url,
            created_at: model.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AlbumArtResponse {
    #[schema(example = "/uploads/albumart/5f0c1c1e-8d1e-4c55-9d47-2f8f4b0c8a11.jpg")]
    pub album_art_url: String,
}
