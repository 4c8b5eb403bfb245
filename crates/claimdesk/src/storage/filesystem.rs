use std::io::Write;
use std::path::{Path, PathBuf};

use super::BlobStore;
use crate::error::StorageError;

/// Directory (inside the data directory) holding one file per media payload.
pub const MEDIA_DIR_NAME: &str = "media";

const PAYLOAD_EXTENSION: &str = "uri";

pub(crate) fn ensure_directory(path: &Path) -> Result<(), StorageError> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| StorageError::CreateDirectory {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// Replaces `path` with `content` so readers see either the old or the new
/// file, never a torn write.
///
/// The content goes to a hidden sibling first and is then renamed over the
/// target. A failed rename leaves the target as it was.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("data");
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let write_result = std::fs::File::create(&tmp_path).and_then(|mut file| {
        file.write_all(content)?;
        file.sync_all()
    });
    if let Err(e) = write_result {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(StorageError::WriteFile {
            path: tmp_path,
            source: e,
        });
    }

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(StorageError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        });
    }
    Ok(())
}

/// Media ids become file names, so only a conservative character set is
/// accepted.
fn validate_key(file_id: &str) -> Result<(), StorageError> {
    let valid = !file_id.is_empty()
        && file_id.len() <= 128
        && file_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(file_id.to_string()))
    }
}

/// Blob store keeping each payload in its own file.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    directory: PathBuf,
}

impl FileBlobStore {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn payload_path(&self, file_id: &str) -> Result<PathBuf, StorageError> {
        validate_key(file_id)?;
        Ok(self
            .directory
            .join(format!("{}.{}", file_id, PAYLOAD_EXTENSION)))
    }
}

impl BlobStore for FileBlobStore {
    fn put(&self, file_id: &str, payload: &str) -> Result<(), StorageError> {
        let path = self.payload_path(file_id)?;
        write_atomic(&path, payload.as_bytes())?;
        log::debug!("Stored media payload {} ({} bytes)", file_id, payload.len());
        Ok(())
    }

    fn get(&self, file_id: &str) -> Result<Option<String>, StorageError> {
        let path = self.payload_path(file_id)?;
        match std::fs::read_to_string(&path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFile { path, source: e }),
        }
    }

    fn delete(&self, file_id: &str) -> Result<(), StorageError> {
        let path = self.payload_path(file_id)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::RemoveFile { path, source: e }),
        }
    }
}
