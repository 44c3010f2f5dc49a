//! # Optimizer Module
//!
//! Separa le responsabilità della run in sottomoduli:
//! - `image_optimizer`: Orchestratore principale (backup, walk, pool di worker)
//! - `progress_tracker`: Progress bar ed eventi JSON per file
//! - `path_resolver`: Logica di calcolo path centralizzata

pub mod image_optimizer;
pub mod path_resolver;
pub mod progress_tracker;

pub use image_optimizer::{ImageOptimizer, RunReport};
pub use path_resolver::PathResolver;
pub use progress_tracker::ProgressTracker;
