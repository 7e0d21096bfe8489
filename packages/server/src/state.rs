use std::sync::Arc;

use common::storage::FileStore;
use sea_orm::DatabaseConnection;
use tracing::info_span;

use crate::config::AppConfig;
use crate::repository::SeaOrmSongRepository;
use crate::services::SongService;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub songs: SongService,
    pub files: Arc<dyn FileStore>,
}

impl AppState {
    /// Wire the song service over the database and file store.
    pub fn new(config: AppConfig, db: DatabaseConnection, files: Arc<dyn FileStore>) -> Self {
        let repo = Arc::new(SeaOrmSongRepository::new(db));
        let songs = SongService::new(repo, files.clone(), info_span!("song_service"));
        Self {
            config,
            songs,
            files,
        }
    }
}
