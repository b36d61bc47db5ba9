//! Names derived from a file path for the extraction record.

use serde::Serialize;
use std::path::Path;

/// Identity names for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileNames {
    pub folder_name: String,
    pub composite_file_name: String,
    /// Display name with the `<folder>_` prefix removed.
    pub file_name: String,
    /// `file_name` without its extension.
    pub seismic_name: String,
    pub file_windows_path: String,
    pub file_unix_path: String,
}

impl FileNames {
    pub fn from_path(path: &Path) -> Self {
        let folder_name = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let composite_file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = clean_file_name(&folder_name, &composite_file_name);
        let seismic_name = Path::new(&file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let raw = path.to_string_lossy();
        Self {
            folder_name,
            composite_file_name,
            file_name,
            seismic_name,
            file_windows_path: raw.replace('/', "\\"),
            file_unix_path: raw.replace('\\', "/"),
        }
    }
}

/// Strip a leading folder name and any `_`/`-` separators after it.
///
/// Names that do not start with the folder name are returned unchanged.
pub fn clean_file_name(folder_name: &str, file_name: &str) -> String {
    if folder_name.is_empty() {
        return file_name.to_string();
    }
    match file_name.strip_prefix(folder_name) {
        Some(rest) => rest.trim_start_matches(['_', '-']).to_string(),
        None => file_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_stripped() {
        assert_eq!(clean_file_name("WELL123", "WELL123_RAW.sgy"), "RAW.sgy");
        assert_eq!(clean_file_name("WELL123", "WELL123-_-RAW.sgy"), "RAW.sgy");
        assert_eq!(clean_file_name("WELL123", "WELL123RAW.sgy"), "RAW.sgy");
    }

    #[test]
    fn test_no_shared_prefix() {
        assert_eq!(clean_file_name("A", "B.sgy"), "B.sgy");
        assert_eq!(clean_file_name("", "_B.sgy"), "_B.sgy");
    }

    #[test]
    fn test_from_path() {
        let names = FileNames::from_path(Path::new("/data/LINE01/LINE01_mig.segy"));
        assert_eq!(names.folder_name, "LINE01");
        assert_eq!(names.composite_file_name, "LINE01_mig.segy");
        assert_eq!(names.file_name, "mig.segy");
        assert_eq!(names.seismic_name, "mig");
        assert_eq!(names.file_unix_path, "/data/LINE01/LINE01_mig.segy");
        assert_eq!(names.file_windows_path, "\\data\\LINE01\\LINE01_mig.segy");
    }
}
