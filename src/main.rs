//! # Space Image Normalizer - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Domande interattive per i parametri mancanti (directory, lunghezza, backup)
//! - Creazione della configurazione e avvio dell'optimizer
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (directory, max-length, backup, workers, etc.)
//! 2. Configura il logging (RUST_LOG, oppure INFO/DEBUG a seconda del flag verbose)
//! 3. Chiede all'utente i parametri non passati sulla command line
//! 4. Crea un oggetto Config e istanzia ImageOptimizer
//! 5. Esegue backup (opzionale) e normalizzazione
//!
//! ## Esempio di utilizzo:
//! ```bash
//! image-normalizer ~/Pictures/2024 --max-length 1920 --backup --workers 4
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use space_image_normalizer::confirm::{self, ConsolePrompt};
use space_image_normalizer::{Config, ImageOptimizer, JsonMessage};

#[derive(Parser)]
#[command(name = "image-normalizer")]
#[command(about = "Convert PNG/BMP to JPEG and downsize oversized photos in place")]
struct Args {
    /// Directory containing the images (asked interactively if omitted)
    image_directory: Option<PathBuf>,

    /// Maximum length of the longer edge in pixels (asked interactively if omitted)
    #[arg(short, long)]
    max_length: Option<u32>,

    /// Copy the images to <DIR>-ORIGINAL before modifying them
    #[arg(short, long, conflicts_with = "no_backup")]
    backup: bool,

    /// Skip the backup without asking
    #[arg(long)]
    no_backup: bool,

    /// Number of parallel workers (1 = sequential)
    #[arg(short, long, default_value = "1")]
    workers: usize,

    /// Output progress as JSON lines on stdout (non-interactive)
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args)?;

    let json_output = args.json;
    let result = run(args).await;

    if json_output {
        if let Err(ref e) = result {
            JsonMessage::error(e.to_string(), Some(format!("{:#}", e))).emit();
        }
    }

    result
}

fn init_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    // stdout è riservato ai messaggi JSON
    if args.json {
        tracing::subscriber::set_global_default(builder.with_writer(std::io::stderr).finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let config = if args.json {
        non_interactive_config(args)?
    } else {
        interactive_config(args)?
    };

    let optimizer = ImageOptimizer::new(config)?;
    optimizer.run().await?;

    Ok(())
}

/// Modalità JSON: nessuna domanda, i parametri mancanti prendono i default
fn non_interactive_config(args: Args) -> Result<Config> {
    let root = args
        .image_directory
        .context("An image directory is required with --json")?;
    let defaults = Config::default();

    Ok(Config {
        root,
        max_length: args.max_length.unwrap_or(defaults.max_length),
        backup: args.backup,
        workers: args.workers,
        json_output: true,
    })
}

fn interactive_config(args: Args) -> Result<Config> {
    let mut prompt = ConsolePrompt::stdio();

    let root = match args.image_directory {
        Some(root) => root,
        None => confirm::request_directory(&mut prompt).context("Failed to read the image directory")?,
    };

    let max_length = match args.max_length {
        Some(max_length) => max_length,
        None => confirm::request_max_length(&mut prompt).context("Failed to read the maximum length")?,
    };

    let backup = if args.backup {
        true
    } else if args.no_backup {
        false
    } else {
        confirm::request_backup_decision(&mut prompt).context("Failed to read the backup answer")?
    };

    Ok(Config {
        root,
        max_length,
        backup,
        workers: args.workers,
        json_output: false,
    })
}
