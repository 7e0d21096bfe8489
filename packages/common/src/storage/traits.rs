use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;
use super::reference::FileRef;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Storage for binary assets addressed by [`FileRef`].
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store bytes under a freshly generated name that keeps the extension
    /// of `original_name`, and return the reference.
    async fn save(&self, data: &[u8], original_name: &str) -> Result<FileRef, StorageError>;

    /// Retrieve a file as a streaming async reader.
    async fn get_stream(&self, reference: &FileRef) -> Result<BoxReader, StorageError>;

    /// Retrieve all bytes of a file.
    async fn read(&self, reference: &FileRef) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.get_stream(reference).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Check whether a file exists.
    async fn exists(&self, reference: &FileRef) -> Result<bool, StorageError>;

    /// Delete a file.
    ///
    /// Returns `true` if the file was deleted, `false` if it did not exist.
    async fn delete(&self, reference: &FileRef) -> Result<bool, StorageError>;
}
