mod album_art;
mod common;
