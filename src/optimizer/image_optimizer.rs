//! # Image Optimizer Main Orchestrator
//!
//! Orchestratore della run: valida la configurazione, crea il backup, raccoglie
//! i file e delega la normalizzazione al walker (sequenziale) o a un pool di
//! worker bloccanti limitato da un semaforo.

use crate::{
    accountant::RunSummary,
    backup::{BackupCreator, BackupReport},
    config::{Config, JPEG_QUALITY},
    file_manager::FileManager,
    json_output::JsonMessage,
    normalizer::ImageNormalizer,
    optimizer::progress_tracker::ProgressTracker,
    progress::ProgressManager,
    walker::{DirectoryWalker, FileOutcome},
};
use anyhow::{Context, Result};
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, info};

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: RunSummary,
    pub backup: Option<BackupReport>,
    pub duration: Duration,
}

/// Orchestratore principale
pub struct ImageOptimizer {
    config: Config,
    normalizer: ImageNormalizer,
}

impl ImageOptimizer {
    /// Validates `config` before anything touches the filesystem
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let root = config
            .root
            .canonicalize()
            .with_context(|| format!("Failed to resolve image directory: {}", config.root.display()))?;
        let normalizer = ImageNormalizer::new(config.max_length)?;

        Ok(Self {
            config: Config { root, ..config },
            normalizer,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Esegue la run completa
    pub async fn run(&self) -> Result<RunReport> {
        let start_time = Instant::now();

        let root = self.config.root.clone();
        let files = tokio::task::spawn_blocking(move || FileManager::find_image_files(&root))
            .await
            .context("File discovery task panicked")?
            .with_context(|| format!("Failed to scan {}", self.config.root.display()))?;

        self.emit_start_message(&files);

        let backup = if self.config.backup {
            Some(self.create_backup().await?)
        } else {
            None
        };

        if files.is_empty() {
            info!("No images found to process");
            let report = RunReport {
                summary: RunSummary::new(),
                backup,
                duration: start_time.elapsed(),
            };
            self.print_final_stats(&report);
            return Ok(report);
        }

        let progress_tracker = ProgressTracker::new(files.len(), self.config.json_output);

        let summary = if self.config.workers > 1 {
            self.process_files_concurrently(files, progress_tracker.clone()).await?
        } else {
            self.process_files_sequentially(files, progress_tracker.clone()).await?
        };

        progress_tracker.finish(&summary.format_summary());

        let report = RunReport {
            summary,
            backup,
            duration: start_time.elapsed(),
        };
        self.print_final_stats(&report);

        Ok(report)
    }

    fn emit_start_message(&self, files: &[PathBuf]) {
        if self.config.json_output {
            JsonMessage::start(&self.config, files.len()).emit();
            return;
        }

        info!("Starting image normalization in: {}", self.config.root.display());
        info!(
            "Maximum length: {}px | JPEG quality: {} | Workers: {}",
            self.config.max_length, JPEG_QUALITY, self.config.workers
        );
        info!("Found {} images to process", files.len());
    }

    /// Il backup è fatale: senza copia completa la run non parte
    async fn create_backup(&self) -> Result<BackupReport> {
        let spinner = (!self.config.json_output).then(|| ProgressManager::spinner("Creating backup..."));

        let root = self.config.root.clone();
        let result = tokio::task::spawn_blocking(move || BackupCreator::backup(&root))
            .await
            .context("Backup task panicked")?;

        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        let report =
            result.with_context(|| format!("Failed to back up {}", self.config.root.display()))?;

        if self.config.json_output {
            JsonMessage::backup(&report).emit();
        }

        Ok(report)
    }

    /// Walker sequenziale su un thread bloccante
    async fn process_files_sequentially(
        &self,
        files: Vec<PathBuf>,
        progress_tracker: ProgressTracker,
    ) -> Result<RunSummary> {
        let walker = DirectoryWalker::new(self.normalizer.clone());

        tokio::task::spawn_blocking(move || {
            walker.process_files(&files, |path, outcome| {
                progress_tracker.handle_file_completion(path, outcome)
            })
        })
        .await
        .context("Normalization worker panicked")
    }

    /// Ogni file su un task bloccante, al massimo `workers` alla volta.
    /// I risultati vengono accumulati qui, nell'ordine di visita.
    async fn process_files_concurrently(
        &self,
        files: Vec<PathBuf>,
        progress_tracker: ProgressTracker,
    ) -> Result<RunSummary> {
        let semaphore = Arc::new(Semaphore::new(self.config.workers));
        let mut tasks = Vec::with_capacity(files.len());

        debug!("Processing with {} concurrent workers", self.config.workers);

        for file_path in files.iter().cloned() {
            let permit = semaphore.clone().acquire_owned().await?;
            let normalizer = self.normalizer.clone();
            let progress_clone = progress_tracker.clone();

            tasks.push(tokio::task::spawn_blocking(move || -> FileOutcome {
                let _permit = permit;
                let outcome = normalizer.normalize(&file_path);
                progress_clone.handle_file_completion(&file_path, &outcome);
                outcome
            }));
        }

        let mut summary = RunSummary::new();
        for (file_path, joined) in files.iter().zip(join_all(tasks).await) {
            let outcome = joined
                .with_context(|| format!("Normalization worker panicked on {}", file_path.display()))?;
            DirectoryWalker::record_outcome(&mut summary, file_path, outcome);
        }

        Ok(summary)
    }

    fn print_final_stats(&self, report: &RunReport) {
        let summary = &report.summary;

        if self.config.json_output {
            JsonMessage::complete(summary, report.duration.as_secs_f64()).emit();
            return;
        }

        let savings = summary.report();
        info!("=== Normalization Complete ===");
        if let Some(backup) = &report.backup {
            info!("Backup: {} images in {}", backup.files_copied, backup.path.display());
        }
        info!("Images checked: {}", summary.checked);
        info!("Images resized: {}", summary.resized);
        info!("Images failed: {}", summary.failed);
        info!("Saved by conversion: {}", savings.conversion);
        info!("Saved by resizing:   {}", savings.resize);
        info!("Total saved:         {}", savings.total);
        info!("Elapsed: {:.2}s", report.duration.as_secs_f64());
    }
}
