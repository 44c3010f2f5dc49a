//! # Progress Tracking Module
//!
//! Unifica progress bar ed eventi JSON in un singolo tracker thread-safe,
//! chiamato una volta per ogni file completato.

use crate::{
    json_output::JsonMessage,
    progress::ProgressManager,
    walker::FileOutcome,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Tracker progress condiviso tra i worker
#[derive(Clone)]
pub struct ProgressTracker {
    total_files: usize,
    completed: Arc<AtomicUsize>,
    json_output: bool,
    progress_manager: ProgressManager,
}

impl ProgressTracker {
    pub fn new(total_files: usize, json_output: bool) -> Self {
        // In modalità JSON la barra resta nascosta, stdout è riservato ai messaggi
        let progress_manager = if json_output {
            ProgressManager::hidden(total_files as u64)
        } else {
            ProgressManager::new(total_files as u64)
        };

        Self {
            total_files,
            completed: Arc::new(AtomicUsize::new(0)),
            json_output,
            progress_manager,
        }
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Gestisce completamento file con eventi JSON automatici
    pub fn handle_file_completion(&self, file_path: &Path, outcome: &FileOutcome) {
        self.completed.fetch_add(1, Ordering::SeqCst);
        let name = file_path.file_name().unwrap_or_default().to_string_lossy();

        let message = match outcome {
            Ok(result) => {
                if self.json_output {
                    JsonMessage::file_complete(result).emit();
                }
                if result.resized {
                    format!("[OK] {}: {} -> {}", name, result.original_dimensions, result.final_dimensions)
                } else {
                    format!("[OK] {}: {}", name, result.final_dimensions)
                }
            }
            Err(e) => {
                if self.json_output {
                    JsonMessage::file_failed(file_path, e.to_string()).emit();
                }
                format!("[ERROR] {}: {}", name, e)
            }
        };

        self.progress_manager.update(&message);
    }

    /// Finalizza progress bar
    pub fn finish(&self, summary: &str) {
        self.progress_manager.finish(&self.finish_message(summary));
    }

    fn finish_message(&self, summary: &str) -> String {
        format!("{}/{} files | {}", self.completed(), self.total_files, summary)
    }
}
