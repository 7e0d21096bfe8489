pub mod album_art;
pub mod song;
