//! Scratch directories for tests that write synthetic files.

/// A temporary directory removed when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("seismic_test_")
        .tempdir()
        .expect("Failed to create temporary test directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_test_dir_is_removed_on_drop() {
        let dir = temp_test_dir();
        let path = dir.path().to_path_buf();
        assert!(path.exists());
        assert!(path.to_string_lossy().contains("seismic_test_"));
        drop(dir);
        assert!(!path.exists());
    }
}
