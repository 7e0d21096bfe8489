pub mod error;
pub mod song;

pub use error::SongError;
pub use song::{AlbumArtUpload, SongInput, SongService};
