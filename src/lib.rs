//! # Space Image Normalizer Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Configurazione della run e validazione parametri
//! - `error`: Tipi di errore custom
//! - `file_manager`: Formati riconosciuti e discovery delle immagini
//! - `resize`: Calcolo delle dimensioni target e resize in memoria
//! - `normalizer`: Conversione in JPEG e ridimensionamento di un singolo file
//! - `accountant`: Totali della run e formattazione MB/GB
//! - `walker`: Visita ricorsiva con isolamento degli errori per-file
//! - `backup`: Copia `<dir>-ORIGINAL` prima di ogni modifica
//! - `confirm`: Domande Y/N con ri-domanda
//! - `optimizer`: Orchestratore principale del processo
//! - `progress` / `json_output`: Feedback visivo e output strutturato
//!
//! ## Utilizzo:
//! ```rust,no_run
//! use space_image_normalizer::{Config, ImageOptimizer};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config { root: "photos".into(), ..Config::default() };
//! let report = ImageOptimizer::new(config)?.run().await?;
//! println!("{}", report.summary.format_summary());
//! # Ok(())
//! # }
//! ```

pub mod accountant;
pub mod backup;
pub mod config;
pub mod confirm;
pub mod error;
pub mod file_manager;
pub mod json_output;
pub mod normalizer;
pub mod optimizer;
pub mod progress;
pub mod resize;
pub mod walker;

pub use accountant::{RunSummary, SavingsReport};
pub use backup::{BackupCreator, BackupReport};
pub use config::Config;
pub use error::NormalizeError;
pub use json_output::JsonMessage;
pub use normalizer::{ImageNormalizer, NormalizationResult};
pub use optimizer::{ImageOptimizer, RunReport};
pub use walker::DirectoryWalker;
