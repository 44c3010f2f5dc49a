//! # Directory Walker Module
//!
//! Visita ricorsivamente una directory e normalizza ogni immagine riconosciuta.
//!
//! ## Responsabilità:
//! - Raccoglie la lista dei candidati prima di modificare qualsiasi file, così
//!   i JPEG creati dalla conversione non vengono rivisitati
//! - Invoca `ImageNormalizer` un file alla volta
//! - Isola gli errori per-file: un'immagine corrotta viene loggata e saltata,
//!   la run continua
//! - Accumula i risultati in un unico `RunSummary`, in ordine di visita

use crate::accountant::RunSummary;
use crate::error::NormalizeError;
use crate::file_manager::FileManager;
use crate::normalizer::{ImageNormalizer, NormalizationResult};
use std::path::{Path, PathBuf};
use tracing::error;

/// Per-file outcome as seen by the walker
pub type FileOutcome = Result<NormalizationResult, NormalizeError>;

/// Sequential walker over a directory tree
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    normalizer: ImageNormalizer,
}

impl DirectoryWalker {
    pub fn new(normalizer: ImageNormalizer) -> Self {
        Self { normalizer }
    }

    /// Normalize every recognized image under `root`
    pub fn walk(&self, root: &Path) -> Result<RunSummary, NormalizeError> {
        self.walk_with(root, |_, _| {})
    }

    /// Like [`walk`](Self::walk), calling `on_file` after each file
    pub fn walk_with<F>(&self, root: &Path, on_file: F) -> Result<RunSummary, NormalizeError>
    where
        F: FnMut(&Path, &FileOutcome),
    {
        if !root.is_dir() {
            return Err(NormalizeError::Validation(format!(
                "Image directory does not exist: {}",
                root.display()
            )));
        }

        let files = FileManager::find_image_files(root)?;
        Ok(self.process_files(&files, on_file))
    }

    /// Normalize an already collected list of files, in order
    pub fn process_files<F>(&self, files: &[PathBuf], mut on_file: F) -> RunSummary
    where
        F: FnMut(&Path, &FileOutcome),
    {
        let mut summary = RunSummary::new();

        for path in files {
            let outcome = self.normalizer.normalize(path);
            on_file(path, &outcome);
            Self::record_outcome(&mut summary, path, outcome);
        }

        summary
    }

    /// Fold a successful outcome, or log and count a failed one
    pub fn record_outcome(summary: &mut RunSummary, path: &Path, outcome: FileOutcome) {
        match outcome {
            Ok(result) => summary.fold(&result),
            Err(e) => {
                error!("Failed to normalize {}: {}", path.display(), e);
                summary.record_failure();
            }
        }
    }
}
