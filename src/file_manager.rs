//! # File Management Module
//!
//! Questo modulo gestisce le operazioni sui file e la discovery delle immagini.
//!
//! ## Responsabilità:
//! - Discovery ricorsiva delle immagini in una directory
//! - Determinazione formato sorgente dall'estensione (case-insensitive)
//! - Lettura della dimensione su disco (sempre fresca, mai in cache)
//! - Utilità per calcoli percentuali di riduzione
//!
//! ## Formati supportati:
//! - **JPEG**: JPG, JPEG (formato di destinazione, nessuna conversione)
//! - **PNG**, **BMP**: convertiti in JPEG
//!
//! ## Esempio:
//! ```rust,ignore
//! let files = FileManager::find_image_files(Path::new("/photos"))?;
//! for file in files {
//!     let size = FileManager::file_size(&file)?;
//! }
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Source format derived from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Bmp,
}

impl SourceFormat {
    /// Detect the format from the extension, ignoring case
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Whether the file has to be re-encoded as JPEG
    pub fn needs_conversion(&self) -> bool {
        !matches!(self, Self::Jpeg)
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Bmp => "BMP",
        };
        f.write_str(name)
    }
}

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Size of a file in bytes, read from the filesystem every time
    pub fn file_size(path: &Path) -> io::Result<u64> {
        Ok(std::fs::metadata(path)?.len())
    }

    /// Find all recognized image files under a directory
    pub fn find_image_files(root: &Path) -> io::Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Not a directory: {}", root.display()),
            ));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            if entry.file_type().is_file() && Self::is_supported_format(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Check if a file has one of the recognized image extensions
    pub fn is_supported_format(path: &Path) -> bool {
        SourceFormat::from_path(path).is_some()
    }

    /// Calculate percentage reduction (negative when the file grew)
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}
