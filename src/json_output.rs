//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per chi orchestra la CLI
//! da un altro processo.
//!
//! ## Responsabilità:
//! - Emette un messaggio JSON per riga su stdout
//! - Riusa `NormalizationResult` e `RunSummary` senza duplicare i campi
//! - I log tracing vanno su stderr in questa modalità, stdout resta pulito
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio della run
//! - `backup`: Backup completato
//! - `file_complete`: Fine elaborazione di un file (con errore opzionale)
//! - `complete`: Fine della run con totali e stringhe MB/GB
//! - `error`: Errore fatale

use crate::accountant::{RunSummary, SavingsReport};
use crate::backup::BackupReport;
use crate::config::Config;
use crate::normalizer::NormalizationResult;
use crate::resize::Dimensions;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Tipo di messaggio JSON
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    #[serde(rename = "start")]
    Start {
        root: PathBuf,
        max_length: u32,
        jpeg_quality: u8,
        backup: bool,
        workers: usize,
        total_files: usize,
    },

    #[serde(rename = "backup")]
    Backup {
        path: PathBuf,
        files_copied: usize,
        bytes_copied: u64,
    },

    #[serde(rename = "file_complete")]
    FileComplete {
        path: PathBuf,
        resized: bool,
        conversion_savings: i64,
        resize_savings: i64,
        original_dimensions: Option<Dimensions>,
        final_dimensions: Option<Dimensions>,
        error: Option<String>,
    },

    #[serde(rename = "complete")]
    Complete {
        #[serde(flatten)]
        summary: RunSummary,
        report: SavingsReport,
        duration_seconds: f64,
    },

    #[serde(rename = "error")]
    Error {
        message: String,
        details: Option<String>,
    },
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn start(config: &Config, total_files: usize) -> Self {
        Self::Start {
            root: config.root.clone(),
            max_length: config.max_length,
            jpeg_quality: crate::config::JPEG_QUALITY,
            backup: config.backup,
            workers: config.workers,
            total_files,
        }
    }

    pub fn backup(report: &BackupReport) -> Self {
        Self::Backup {
            path: report.path.clone(),
            files_copied: report.files_copied,
            bytes_copied: report.bytes_copied,
        }
    }

    pub fn file_complete(result: &NormalizationResult) -> Self {
        Self::FileComplete {
            path: result.path.clone(),
            resized: result.resized,
            conversion_savings: result.conversion_savings,
            resize_savings: result.resize_savings,
            original_dimensions: Some(result.original_dimensions),
            final_dimensions: Some(result.final_dimensions),
            error: None,
        }
    }

    /// File saltato per errore: nessun risparmio, nessuna dimensione
    pub fn file_failed(path: &Path, error: String) -> Self {
        Self::FileComplete {
            path: path.to_path_buf(),
            resized: false,
            conversion_savings: 0,
            resize_savings: 0,
            original_dimensions: None,
            final_dimensions: None,
            error: Some(error),
        }
    }

    pub fn complete(summary: &RunSummary, duration_seconds: f64) -> Self {
        Self::Complete {
            summary: summary.clone(),
            report: summary.report(),
            duration_seconds,
        }
    }

    pub fn error(message: String, details: Option<String>) -> Self {
        Self::Error { message, details }
    }
}
