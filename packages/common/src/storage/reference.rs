use std::fmt;
use std::path::PathBuf;

use super::error::StorageError;

/// A validated reference to a stored file, expressed as a URL path relative
/// to the public asset root (e.g. `/uploads/albumart/<token>.jpg`).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FileRef(String);

impl FileRef {
    /// Parse and validate a reference string.
    pub fn parse(raw: &str) -> Result<Self, StorageError> {
        let Some(rest) = raw.strip_prefix('/') else {
            return Err(StorageError::InvalidReference(format!(
                "'{raw}' must start with '/'"
            )));
        };

        if rest.is_empty() {
            return Err(StorageError::InvalidReference("empty reference".into()));
        }

        for segment in rest.split('/') {
            validate_segment(segment)
                .map_err(|msg| StorageError::InvalidReference(format!("'{raw}': {msg}")))?;
        }

        Ok(Self(raw.to_string()))
    }

    /// Build a reference from a public directory (`uploads/albumart`) and a
    /// generated file name.
    pub(crate) fn join(dir: &str, file_name: &str) -> Result<Self, StorageError> {
        let dir = dir.trim_matches('/');
        if dir.is_empty() {
            Self::parse(&format!("/{file_name}"))
        } else {
            Self::parse(&format!("/{dir}/{file_name}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// Filesystem path relative to the asset root.
    pub fn relative_path(&self) -> PathBuf {
        self.0.trim_start_matches('/').split('/').collect()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn validate_segment(segment: &str) -> Result<(), &'static str> {
    if segment.is_empty() {
        return Err("empty path segment");
    }
    if segment == "." || segment == ".." {
        return Err("relative segments are not allowed");
    }
    if segment.starts_with('.') {
        return Err("hidden segments are not allowed");
    }
    if segment.contains('\\') {
        return Err("backslashes are not allowed");
    }
    if segment.chars().any(|c| c == '\0' || c.is_control()) {
        return Err("control characters are not allowed");
    }
    Ok(())
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileRef({})", self.0)
    }
}

impl AsRef<str> for FileRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
