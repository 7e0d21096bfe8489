pub mod json;
pub mod song_id;
