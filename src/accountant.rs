//! # Space Accounting Module
//!
//! Questo modulo accumula i risultati per-file in totali della run e li formatta.
//!
//! ## Responsabilità:
//! - `RunSummary`: contatori e byte risparmiati, aggiornati solo tramite `fold`
//! - `SavingsReport`: stringhe MB/GB per conversione, resize e totale
//! - Nessun accesso al filesystem, nessuno stato globale
//!
//! ## Statistiche tracciate:
//! - **checked**: immagini elaborate con successo
//! - **resized**: immagini ridimensionate (le sole conversioni PNG/BMP non contano)
//! - **failed**: immagini saltate per errore
//! - **conversion_savings**: byte risparmiati dalla conversione in JPEG
//! - **resize_savings**: byte risparmiati dal resize, rispetto all'originale
//!
//! ## Formato:
//! ```text
//! 4.80 MB    |  0.00 GB
//! 1234.56 MB |  1.23 GB
//! ```

use crate::normalizer::NormalizationResult;
use serde::Serialize;

/// Run-wide totals folded from per-file results
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub checked: usize,
    pub resized: usize,
    pub failed: usize,
    pub conversion_savings: i64,
    pub resize_savings: i64,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one successful result into the totals
    pub fn fold(&mut self, result: &NormalizationResult) {
        self.checked += 1;
        if result.resized {
            self.resized += 1;
        }
        self.conversion_savings += result.conversion_savings;
        self.resize_savings += result.resize_savings;
    }

    /// Count a file that was skipped because of an error
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Conversion savings plus resize savings, as reported at the end of a run
    pub fn total_savings(&self) -> i64 {
        self.conversion_savings + self.resize_savings
    }

    pub fn report(&self) -> SavingsReport {
        SavingsReport::from(self)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Checked: {} | Resized: {} | Failed: {} | Total saved: {}",
            self.checked,
            self.resized,
            self.failed,
            format_savings(self.total_savings()),
        )
    }
}

/// Human-readable savings for the final report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavingsReport {
    pub conversion: String,
    pub resize: String,
    pub total: String,
}

impl From<&RunSummary> for SavingsReport {
    fn from(summary: &RunSummary) -> Self {
        Self {
            conversion: format_savings(summary.conversion_savings),
            resize: format_savings(summary.resize_savings),
            total: format_savings(summary.total_savings()),
        }
    }
}

/// Bytes to decimal megabytes, rounded to two decimals
pub fn bytes_to_megabytes(bytes: i64) -> f64 {
    (bytes as f64 / 10_000.0).round() / 100.0
}

/// Format bytes as `"<MB> MB |  <GB> GB"`, the MB column padded to 10 characters
pub fn format_savings(bytes: i64) -> String {
    let megabytes = bytes_to_megabytes(bytes);
    let mb = format!("{:.2} MB", megabytes);
    format!("{:<10} |  {:.2} GB", mb, megabytes / 1000.0)
}
