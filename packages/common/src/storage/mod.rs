mod error;
mod reference;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use filesystem::FilesystemFileStore;
pub use reference::FileRef;
pub use traits::{BoxReader, FileStore};
