mod v1;

use axum::{Router, routing::get};
use utoipa_axum::router::OpenApiRouter;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest("/v1", v1::routes(config))
}

/// Public album-art files, served under the same path their references use.
pub fn asset_routes(config: &AppConfig) -> Router<AppState> {
    let dir = config.storage.album_art_dir.trim_matches('/');
    let path = if dir.is_empty() {
        "/{file_name}".to_string()
    } else {
        format!("/{dir}/{{file_name}}")
    };

    Router::new().route(&path, get(handlers::album_art::serve_album_art))
}
