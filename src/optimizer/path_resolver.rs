//! # Path Resolution Module
//!
//! Centralizza tutta la logica di calcolo dei path.
//! Evita duplicazione tra ImageNormalizer e BackupCreator.

use crate::error::NormalizeError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension written for every converted image
pub const TARGET_EXTENSION: &str = "jpg";

/// Suffix appended to the root directory name for the backup copy
pub const BACKUP_SUFFIX: &str = "-ORIGINAL";

/// Utility per calcolare i path in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// Path of the JPEG written in place of a converted image: same stem, lowercase `.jpg`
    pub fn converted_path(input_path: &Path) -> Result<PathBuf, NormalizeError> {
        let file_stem = input_path.file_stem().ok_or_else(|| {
            NormalizeError::UnsupportedFormat(format!("Invalid file name: {}", input_path.display()))
        })?;

        let mut file_name = file_stem.to_os_string();
        file_name.push(".");
        file_name.push(TARGET_EXTENSION);

        Ok(input_path.with_file_name(file_name))
    }

    /// Sibling directory that receives the backup: `<parent>/<name>-ORIGINAL`
    pub fn backup_root(root: &Path) -> Result<PathBuf, NormalizeError> {
        let canonical_root = root.canonicalize()?;

        let name = canonical_root.file_name().ok_or_else(|| {
            NormalizeError::Validation(format!(
                "Cannot create a sibling backup for {}",
                canonical_root.display()
            ))
        })?;

        let mut backup_name = OsString::from(name);
        backup_name.push(BACKUP_SUFFIX);

        let result = canonical_root.with_file_name(backup_name);
        debug!("Resolved backup path: {} -> {}", root.display(), result.display());

        Ok(result)
    }

    /// Mirror `path` (located under `base`) into `target_base`
    pub fn mirror_path(path: &Path, base: &Path, target_base: &Path) -> Result<PathBuf, NormalizeError> {
        let relative = path.strip_prefix(base).map_err(|_| {
            NormalizeError::Validation(format!(
                "{} is not inside {}",
                path.display(),
                base.display()
            ))
        })?;
        Ok(target_base.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_converted_path_normalizes_extension() {
        assert_eq!(
            PathResolver::converted_path(Path::new("/photos/a.png")).unwrap(),
            PathBuf::from("/photos/a.jpg")
        );
        assert_eq!(
            PathResolver::converted_path(Path::new("/photos/B.PNG")).unwrap(),
            PathBuf::from("/photos/B.jpg")
        );
        assert_eq!(
            PathResolver::converted_path(Path::new("/photos/scan.BmP")).unwrap(),
            PathBuf::from("/photos/scan.jpg")
        );
    }

    #[test]
    fn test_converted_path_only_touches_the_suffix() {
        // Substring replacement would mangle the directory name
        assert_eq!(
            PathResolver::converted_path(Path::new("/exports.png/my.png.photo.png")).unwrap(),
            PathBuf::from("/exports.png/my.png.photo.jpg")
        );
    }

    #[test]
    fn test_backup_root_is_sibling() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("Holidays");
        std::fs::create_dir(&root).unwrap();

        let backup = PathResolver::backup_root(&root).unwrap();
        assert_eq!(
            backup,
            temp_dir.path().canonicalize().unwrap().join("Holidays-ORIGINAL")
        );
    }

    #[test]
    fn test_mirror_path() {
        let mirrored = PathResolver::mirror_path(
            Path::new("/photos/2023/a.jpg"),
            Path::new("/photos"),
            Path::new("/photos-ORIGINAL"),
        )
        .unwrap();
        assert_eq!(mirrored, PathBuf::from("/photos-ORIGINAL/2023/a.jpg"));

        assert!(PathResolver::mirror_path(
            Path::new("/elsewhere/a.jpg"),
            Path::new("/photos"),
            Path::new("/photos-ORIGINAL"),
        )
        .is_err());
    }
}
