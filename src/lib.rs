//! Aqua ML - Rust библиотека

pub mod constants;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod types;

pub use error::{AquaError, Result};
pub use types::*;
pub use models::*;
pub use preprocessing::*;

// Re-export для удобства
pub use dataset::{variables_targets_split, DatasetSplitter, TrainTestSplit};
pub use evaluation::{ComparisonRow, Evaluator};
pub use pipeline::{run_pipeline, ModelReport, PipelineOutput, PredictionOptions};
