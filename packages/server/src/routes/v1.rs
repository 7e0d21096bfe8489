use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers::song::*;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest("/songs", song_routes(config))
}

fn song_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let crud = OpenApiRouter::new()
        .routes(routes!(list_songs, create_song))
        .routes(routes!(get_song, delete_song));

    let upload = OpenApiRouter::new()
        .routes(routes!(upload_album_art))
        .layer(album_art_body_limit(config.storage.max_file_size));

    crud.merge(upload)
}
