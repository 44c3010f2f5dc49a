//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione di una run.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di normalizzazione
//! - Fornisce validazione dei parametri prima di qualsiasi modifica su disco
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `root`: Directory da normalizzare (ricorsivamente)
//! - `max_length`: Lato lungo massimo in pixel (default: 1920)
//! - `backup`: Copia le immagini in `<root>-ORIGINAL` prima di iniziare (default: false)
//! - `workers`: Numero di worker (default: 1 = elaborazione sequenziale)
//! - `json_output`: Eventi JSON su stdout invece dei log (default: false)
//!
//! ## Validazione:
//! - Controlla che max_length sia > 0
//! - Controlla che workers sia > 0
//! - Controlla che root esista e sia una directory
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     root: PathBuf::from("/photos"),
//!     max_length: 2560,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use crate::error::NormalizeError;
use std::path::PathBuf;

/// Quality used for every JPEG the normalizer writes
pub const JPEG_QUALITY: u8 = 75;

/// Longer-edge sizes that are unusual enough to ask for confirmation
pub const SUSPICIOUS_LARGE_LENGTH: u32 = 4000;
pub const SUSPICIOUS_SMALL_LENGTH: u32 = 360;

/// Configuration for one normalization run
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory to normalize
    pub root: PathBuf,
    /// Maximum length of the longer edge, in pixels
    pub max_length: u32,
    /// Copy recognized images to `<root>-ORIGINAL` before mutating anything
    pub backup: bool,
    /// Number of parallel workers (1 = strictly sequential)
    pub workers: usize,
    /// Output progress and results as JSON lines
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            max_length: 1920,
            backup: false,
            workers: 1,
            json_output: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), NormalizeError> {
        if self.max_length == 0 {
            return Err(NormalizeError::Validation(
                "Maximum image length must be greater than 0".to_string(),
            ));
        }

        if self.workers == 0 {
            return Err(NormalizeError::Validation(
                "Number of workers must be greater than 0".to_string(),
            ));
        }

        if !self.root.exists() {
            return Err(NormalizeError::Validation(format!(
                "Image directory does not exist: {}",
                self.root.display()
            )));
        }
        if !self.root.is_dir() {
            return Err(NormalizeError::Validation(format!(
                "Image path is not a directory: {}",
                self.root.display()
            )));
        }

        Ok(())
    }

    /// Whether `max_length` is far enough from typical screen sizes to double-check
    pub fn is_suspicious_length(max_length: u32) -> bool {
        max_length >= SUSPICIOUS_LARGE_LENGTH || max_length <= SUSPICIOUS_SMALL_LENGTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_validation() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config {
            root: temp_dir.path().to_path_buf(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.max_length = 0;
        assert!(matches!(config.validate(), Err(NormalizeError::Validation(_))));

        config.max_length = 1920;
        config.workers = 0;
        assert!(matches!(config.validate(), Err(NormalizeError::Validation(_))));
    }

    #[test]
    fn test_config_rejects_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            root: temp_dir.path().join("does-not-exist"),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(NormalizeError::Validation(_))));
    }

    #[test]
    fn test_config_rejects_file_root() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("notes.txt");
        std::fs::write(&file, "not a directory").unwrap();

        let config = Config {
            root: file,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(NormalizeError::Validation(_))));
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_length, 1920);
        assert!(!config.backup);
        assert_eq!(config.workers, 1);
        assert!(!config.json_output);
    }

    #[test]
    fn test_suspicious_lengths() {
        assert!(Config::is_suspicious_length(4000));
        assert!(Config::is_suspicious_length(50));
        assert!(Config::is_suspicious_length(360));
        assert!(!Config::is_suspicious_length(361));
        assert!(!Config::is_suspicious_length(1920));
        assert!(!Config::is_suspicious_length(3999));
    }
}
