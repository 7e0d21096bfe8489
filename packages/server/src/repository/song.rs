use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{NewSong, RepositoryError, SongRepository};
use crate::entity::song;

#[derive(Clone)]
pub struct SeaOrmSongRepository {
    db: DatabaseConnection,
}

impl SeaOrmSongRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SongRepository for SeaOrmSongRepository {
    async fn create(&self, new_song: NewSong) -> Result<song::Model, RepositoryError> {
        let model = song::ActiveModel {
            id: Set(new_song.id.unwrap_or_else(Uuid::now_v7)),
            title: Set(new_song.title),
            artist: Set(new_song.artist),
            album: Set(new_song.album),
            genre: Set(new_song.genre),
            album_art_url: Set(None),
            created_at: Set(Utc::now()),
        };

        Ok(model.insert(&self.db).await?)
    }

    async fn list(&self) -> Result<Vec<song::Model>, RepositoryError> {
        Ok(song::Entity::find()
            .order_by_asc(song::Column::CreatedAt)
            .order_by_asc(song::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<song::Model, RepositoryError> {
        song::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn swap_album_art(
        &self,
        id: Uuid,
        expected: Option<&str>,
        new: &str,
    ) -> Result<bool, RepositoryError> {
        let update = song::Entity::update_many()
            .col_expr(song::Column::AlbumArtUrl, Expr::value(new.to_string()))
            .filter(song::Column::Id.eq(id));

        let update = match expected {
            Some(current) => update.filter(song::Column::AlbumArtUrl.eq(current)),
            None => update.filter(song::Column::AlbumArtUrl.is_null()),
        };

        let result = update.exec(&self.db).await?;
        Ok(result.rows_affected == 1)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = song::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }
}
