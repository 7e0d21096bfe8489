use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;
use tracing::{Span, info, warn};

use super::error::StorageError;
use super::reference::FileRef;
use super::traits::{BoxReader, FileStore};

/// Longest file extension carried over from an uploaded file name.
const MAX_EXTENSION_LEN: usize = 16;

/// Filesystem-backed file store.
///
/// Files are written to `{asset_root}/{public_dir}/{uuid}{.ext}` and referenced
/// as `/{public_dir}/{uuid}{.ext}`. Writes go through `{asset_root}/.tmp` and
/// are renamed into place, so a reference never points at a partial file.
pub struct FilesystemFileStore {
    asset_root: PathBuf,
    public_dir: String,
    max_size: u64,
    span: Span,
}

impl FilesystemFileStore {
    /// Create a new filesystem file store, creating its directories.
    pub async fn new(
        asset_root: PathBuf,
        public_dir: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        let public_dir = public_dir.into().trim_matches('/').to_string();
        fs::create_dir_all(asset_root.join(&public_dir)).await?;
        fs::create_dir_all(asset_root.join(".tmp")).await?;
        Ok(Self {
            asset_root,
            public_dir,
            max_size,
            span: Span::none(),
        })
    }

    /// Attach the span that parents this store's log events.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Compute the filesystem path for a reference.
    fn file_path(&self, reference: &FileRef) -> PathBuf {
        self.asset_root.join(reference.relative_path())
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.asset_root
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

/// Extension (with leading dot) to keep from an uploaded file name, if it is
/// plain ASCII alphanumerics.
fn sanitized_extension(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

async fn move_into_place(temp_path: &Path, file_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::rename(temp_path, file_path).await
}

#[async_trait]
impl FileStore for FilesystemFileStore {
    async fn save(&self, data: &[u8], original_name: &str) -> Result<FileRef, StorageError> {
        if data.is_empty() {
            return Err(StorageError::EmptyContent);
        }
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let file_name = format!(
            "{}{}",
            uuid::Uuid::new_v4(),
            sanitized_extension(original_name)
        );
        let reference = FileRef::join(&self.public_dir, &file_name)?;
        let file_path = self.file_path(&reference);

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            warn!(parent: &self.span, error = %e, "Failed to write temp file");
            return Err(e.into());
        }

        if let Err(e) = move_into_place(&temp_path, &file_path).await {
            let _ = fs::remove_file(&temp_path).await;
            warn!(parent: &self.span, error = %e, "Failed to move file into place");
            return Err(e.into());
        }

        info!(parent: &self.span, %reference, size = data.len(), "File saved");
        Ok(reference)
    }

    async fn get_stream(&self, reference: &FileRef) -> Result<BoxReader, StorageError> {
        match fs::File::open(self.file_path(reference)).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(reference.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, reference: &FileRef) -> Result<bool, StorageError> {
        Ok(fs::try_exists(self.file_path(reference)).await?)
    }

    async fn delete(&self, reference: &FileRef) -> Result<bool, StorageError> {
        match fs::remove_file(self.file_path(reference)).await {
            Ok(()) => {
                info!(parent: &self.span, %reference, "File deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => {
                warn!(parent: &self.span, %reference, error = %e, "Failed to delete file");
                Err(e.into())
            }
        }
    }
}
