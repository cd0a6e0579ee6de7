/// Модуль предобработки данных

pub mod aggregation;
pub mod normalization;
pub mod processor;

pub use aggregation::{AggregationStrategy, ForceAggregator};
pub use normalization::{ForceNormalizer, NormalizationStrategy};
pub use processor::{ForceProcessor, ProcessingOptions};
