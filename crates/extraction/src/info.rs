//! Plain file information.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::Path;

use crate::error::{ExtractionError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub filepath: String,
    pub size: u64,
    /// RFC 3339 local time.
    pub modified: String,
    pub is_file: bool,
    pub is_directory: bool,
}

pub fn file_info(path: &Path) -> Result<FileInfo> {
    if !path.exists() {
        return Err(ExtractionError::Path(format!("File not found: {}", path.display())));
    }
    let meta = std::fs::metadata(path)?;
    let modified = DateTime::<Local>::from(meta.modified()?).to_rfc3339();
    Ok(FileInfo {
        filepath: path.display().to_string(),
        size: meta.len(),
        modified,
        is_file: meta.is_file(),
        is_directory: meta.is_dir(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::temp_test_dir;

    #[test]
    fn test_file_and_directory() {
        let dir = temp_test_dir();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, b"hello").unwrap();

        let info = file_info(&file).unwrap();
        assert_eq!(info.size, 5);
        assert!(info.is_file && !info.is_directory);
        assert!(DateTime::parse_from_rfc3339(&info.modified).is_ok());

        let info = file_info(dir.path()).unwrap();
        assert!(info.is_directory);
    }

    #[test]
    fn test_missing() {
        let err = file_info(Path::new("/nonexistent/notes.txt")).unwrap_err();
        assert_eq!(err.kind(), seismic_common::ErrorKind::PathError);
    }
}
