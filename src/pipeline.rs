//! Полный прогон: обработка сил -> разбиение -> модели -> метрики

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_TARGETS, RANDOM_SEED};
use crate::dataset::{variables_targets_split, DatasetSplitter};
use crate::error::{AquaError, Result};
use crate::evaluation::{ComparisonRow, Evaluator};
use crate::models::{ModelBank, ModelKind};
use crate::preprocessing::{ForceProcessor, ProcessingOptions};
use crate::types::{DataTable, EvaluatedPrediction};

/// Опции панели предсказаний
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionOptions {
    pub targets: Vec<String>,
    /// Доля теста, целый процент в [0, 100]
    pub test_size: u32,
    pub models: Vec<ModelKind>,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    RANDOM_SEED
}

impl Default for PredictionOptions {
    fn default() -> Self {
        Self {
            targets: DEFAULT_TARGETS.iter().map(|t| t.to_string()).collect(),
            test_size: 30,
            models: vec![ModelKind::Linear],
            seed: RANDOM_SEED,
        }
    }
}

/// Предсказания тестовой выборки одного вида модели
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelReport {
    pub model: String,
    pub predictions: Vec<EvaluatedPrediction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub processed: DataTable,
    pub train_rows: usize,
    pub test_rows: usize,
    pub reports: Vec<ModelReport>,
    /// Конкатенация всех отчетов с тегом модели для сравнения
    pub comparison: Vec<ComparisonRow>,
}

/// Один батч-прогон целиком. Все стадии чистые; зерно задается один
/// раз и передается и в разбиение, и в стохастические модели.
pub fn run_pipeline(
    raw: &DataTable,
    processing: &ProcessingOptions,
    prediction: &PredictionOptions,
) -> Result<PipelineOutput> {
    if prediction.models.is_empty() {
        return Err(AquaError::Configuration(
            "at least one prediction model must be selected".to_string(),
        ));
    }
    if prediction.targets.is_empty() {
        return Err(AquaError::Configuration(
            "at least one target metric must be selected".to_string(),
        ));
    }

    let processed = ForceProcessor::process(raw, processing)?;
    let (targets, variables) = variables_targets_split(&processed, &prediction.targets)?;
    let split = DatasetSplitter::new(prediction.seed).split(
        &variables,
        &targets,
        prediction.test_size,
    )?;

    tracing::info!(
        train_rows = split.x_train.n_rows(),
        test_rows = split.x_test.n_rows(),
        "dataset split"
    );

    let mut reports = Vec::with_capacity(prediction.models.len());
    let mut comparison = Vec::new();
    for &kind in &prediction.models {
        let mut bank = ModelBank::new(kind, prediction.seed);
        bank.fit(&split.x_train, &split.y_train)?;
        let records = bank.predict(&split.x_test, &split.y_test)?;
        let predictions = Evaluator::evaluate(&records);

        comparison.extend(predictions.iter().map(|p| ComparisonRow::tagged(kind, p)));
        reports.push(ModelReport {
            model: kind.as_str().to_string(),
            predictions,
        });
    }

    Ok(PipelineOutput {
        processed,
        train_rows: split.x_train.n_rows(),
        test_rows: split.x_test.n_rows(),
        reports,
        comparison,
    })
}
