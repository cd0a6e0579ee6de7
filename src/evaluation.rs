//! Построчные метрики ошибок предсказаний

use serde::{Deserialize, Serialize};

use crate::models::ModelKind;
use crate::types::{EvaluatedPrediction, PredictionRecord};

pub struct Evaluator;

impl Evaluator {
    /// MAE и MAPE на каждую запись, без агрегации (сводки — забота
    /// слоя отчетов). При real = 0 MAPE уходит в бесконечность и
    /// передается дальше как есть.
    pub fn evaluate(records: &[PredictionRecord]) -> Vec<EvaluatedPrediction> {
        records
            .iter()
            .map(|r| EvaluatedPrediction {
                target: r.target.clone(),
                real: r.real,
                predicted: r.predicted,
                absolute_error: (r.real - r.predicted).abs(),
                percent_error: ((r.real - r.predicted) / r.real).abs() * 100.0,
            })
            .collect()
    }
}

/// Строка сводной таблицы сравнения моделей
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub model: String,
    pub target: String,
    pub real: f64,
    pub predicted: f64,
    pub absolute_error: f64,
    pub percent_error: f64,
}

impl ComparisonRow {
    pub fn tagged(kind: ModelKind, prediction: &EvaluatedPrediction) -> Self {
        Self {
            model: kind.as_str().to_string(),
            target: prediction.target.clone(),
            real: prediction.real,
            predicted: prediction.predicted,
            absolute_error: prediction.absolute_error,
            percent_error: prediction.percent_error,
        }
    }
}
