use std::fs;
use std::path::Path;

use crate::errors::StorageError;

/// Writes `content` to `path` through a sibling temp file and a rename, so a
/// reader sees either the old or the new contents and never a partial write.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), StorageError> {
    let tmp_path = path.with_extension("lintpad-tmp");
    let key = path.display().to_string();

    if let Err(e) = fs::write(&tmp_path, content) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StorageError::Io {
            key,
            message: format!("Failed to write temp file: {}", e),
        });
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StorageError::Io {
            key,
            message: format!("Failed to rename temp file: {}", e),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_existing_contents_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"old").unwrap();

        atomic_write(&path, b"new").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new");
        assert!(!path.with_extension("lintpad-tmp").exists());
    }

    #[test]
    fn missing_parent_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("config.json");

        let err = atomic_write(&path, b"{}").unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
