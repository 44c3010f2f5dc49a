//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `NormalizeError` enum per categorizzare tutti gli errori possibili
//! - Separa gli errori per-file (isolati dal walker) da quelli fatali per la run
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (lettura, scrittura, cancellazione)
//! - `Decode`: File non decodificabile come immagine valida
//! - `Encode`: Fallimento dell'encoder JPEG
//! - `UnsupportedFormat`: Estensione non riconosciuta
//! - `Validation`: Errori di validazione input (max length, directory)
//! - `UnrecognizedConfirmation`: Risposta Y/N non riconosciuta
//!
//! ## Politica di propagazione:
//! - `Io`, `Decode`, `Encode`, `UnsupportedFormat` durante un singolo file:
//!   catturati dal walker, loggati, la run continua
//! - `Validation`: fatale, prima di qualsiasi backup o modifica
//! - `UnrecognizedConfirmation`: la domanda viene ripetuta
//!
//! ## Esempio:
//! ```rust,ignore
//! if config.max_length == 0 {
//!     return Err(NormalizeError::Validation("max length must be positive".to_string()));
//! }
//! ```

/// Custom error types for image normalization
#[derive(thiserror::Error, Debug)]
pub enum NormalizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decode error: {0}")]
    Decode(image::ImageError),

    #[error("JPEG encode error: {0}")]
    Encode(image::ImageError),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unrecognized answer: {0:?} (valid answers are Y/N)")]
    UnrecognizedConfirmation(String),
}

impl NormalizeError {
    /// Classify an error raised while reading/decoding an image
    pub fn decode(error: image::ImageError) -> Self {
        match error {
            image::ImageError::IoError(e) => Self::Io(e),
            other => Self::Decode(other),
        }
    }

    /// Classify an error raised while encoding/writing an image
    pub fn encode(error: image::ImageError) -> Self {
        match error {
            image::ImageError::IoError(e) => Self::Io(e),
            other => Self::Encode(other),
        }
    }
}
