//! # Backup Module
//!
//! Copia le immagini riconosciute in una directory sorella `<root>-ORIGINAL`
//! prima che la normalizzazione modifichi qualsiasi file.
//!
//! ## Regole di copia:
//! - La struttura delle sottodirectory viene preservata (anche quelle vuote)
//! - Solo JPG/JPEG/PNG/BMP vengono copiati, tutti gli altri file sono esclusi
//! - Se la destinazione esiste già, i file vengono uniti: quelli copiati
//!   sovrascrivono, quelli estranei restano intatti
//!
//! ## Errori:
//! Qualsiasi errore è fatale: la conversione è irreversibile, quindi senza un
//! backup completo la run non deve partire.

use crate::error::NormalizeError;
use crate::file_manager::FileManager;
use crate::optimizer::path_resolver::PathResolver;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// What a completed backup produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupReport {
    pub path: PathBuf,
    pub files_copied: usize,
    pub bytes_copied: u64,
}

/// Creates the pre-mutation copy of a directory
pub struct BackupCreator;

impl BackupCreator {
    /// Copy every recognized image under `root` into its `-ORIGINAL` sibling
    pub fn backup(root: &Path) -> Result<BackupReport, NormalizeError> {
        let source_root = root.canonicalize()?;
        let backup_root = PathResolver::backup_root(&source_root)?;

        info!(
            "Creating backup of {} in {}",
            source_root.display(),
            backup_root.display()
        );

        fs::create_dir_all(&backup_root)?;

        let mut files_copied = 0;
        let mut bytes_copied = 0;

        for entry in WalkDir::new(&source_root).min_depth(1) {
            let entry = entry.map_err(|e| {
                NormalizeError::Io(e.into_io_error().unwrap_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop detected")
                }))
            })?;
            let target = PathResolver::mirror_path(entry.path(), &source_root, &backup_root)?;

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else if entry.file_type().is_file() && FileManager::is_supported_format(entry.path()) {
                bytes_copied += fs::copy(entry.path(), &target)?;
                files_copied += 1;
                debug!("Backed up {}", entry.path().display());
            }
        }

        info!("Backup complete: {} images copied to {}", files_copied, backup_root.display());

        Ok(BackupReport {
            path: backup_root,
            files_copied,
            bytes_copied,
        })
    }
}
