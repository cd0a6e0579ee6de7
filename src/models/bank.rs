//! Реестр моделей и банк по-целевых экземпляров

#![allow(non_snake_case)]

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{AquaError, Result};
use crate::models::boosting::GradientBoostingRegressor;
use crate::models::forest::RandomForestRegressor;
use crate::models::linear::{LassoRegression, LinearModel, RidgeRegression};
use crate::types::{DataTable, PredictionRecord};

/// Общий интерфейс регрессоров банка
pub trait Regressor {
    fn fit(&mut self, X: &Array2<f64>, y: &Array1<f64>) -> Result<()>;
    fn predict(&self, X: &Array2<f64>) -> Result<Array1<f64>>;
}

/// Закрытый реестр видов моделей; никакого глобального словаря
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "Linear regression")]
    Linear,
    Ridge,
    Lasso,
    #[serde(rename = "Random forest")]
    RandomForest,
    #[serde(rename = "Gradient boosting")]
    GradientBoosting,
}

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        ModelKind::Linear,
        ModelKind::Ridge,
        ModelKind::Lasso,
        ModelKind::RandomForest,
        ModelKind::GradientBoosting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Linear => "Linear regression",
            ModelKind::Ridge => "Ridge",
            ModelKind::Lasso => "Lasso",
            ModelKind::RandomForest => "Random forest",
            ModelKind::GradientBoosting => "Gradient boosting",
        }
    }

    /// Новый необученный экземпляр; зерно получают только
    /// стохастические модели
    fn build(&self, seed: u64) -> Box<dyn Regressor> {
        match self {
            ModelKind::Linear => Box::new(LinearModel::new()),
            ModelKind::Ridge => Box::new(RidgeRegression::new(1.0)),
            ModelKind::Lasso => Box::new(LassoRegression::new(0.1)),
            ModelKind::RandomForest => Box::new(RandomForestRegressor::new(seed)),
            ModelKind::GradientBoosting => Box::new(GradientBoostingRegressor::new(seed)),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = AquaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Linear regression" => Ok(ModelKind::Linear),
            "Ridge" => Ok(ModelKind::Ridge),
            "Lasso" => Ok(ModelKind::Lasso),
            "Random forest" => Ok(ModelKind::RandomForest),
            "Gradient boosting" => Ok(ModelKind::GradientBoosting),
            other => Err(AquaError::Configuration(format!(
                "{other} is not a prediction model"
            ))),
        }
    }
}

/// По одной независимой модели на каждую целевую колонку y;
/// все модели обучаются на одной и той же матрице X
pub struct ModelBank {
    kind: ModelKind,
    seed: u64,
    models: Vec<(String, Box<dyn Regressor>)>,
}

impl ModelBank {
    pub fn new(kind: ModelKind, seed: u64) -> Self {
        Self {
            kind,
            seed,
            models: Vec::new(),
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn n_models(&self) -> usize {
        self.models.len()
    }

    pub fn fit(&mut self, x_train: &DataTable, y_train: &DataTable) -> Result<()> {
        if x_train.is_empty() {
            return Err(AquaError::Model("empty training set".to_string()));
        }

        let X = x_train.to_matrix();
        self.models.clear();
        for target in &y_train.columns {
            let mut model = self.kind.build(self.seed);
            model.fit(&X, &Array1::from(target.values.clone()))?;
            self.models.push((target.name.clone(), model));
        }
        Ok(())
    }

    /// Одна запись на (строку, цель); порядок строк сохраняется,
    /// записи всех целей конкатенируются в одну плоскую таблицу
    pub fn predict(&self, x: &DataTable, y: &DataTable) -> Result<Vec<PredictionRecord>> {
        if self.models.is_empty() {
            return Err(AquaError::Model("model bank is not fitted".to_string()));
        }

        let X = x.to_matrix();
        let mut records = Vec::with_capacity(self.models.len() * x.n_rows());
        for (target, model) in &self.models {
            let predicted = model.predict(&X)?;
            let real = y.column(target)?;
            for (&real, &predicted) in real.iter().zip(predicted.iter()) {
                records.push(PredictionRecord {
                    target: target.clone(),
                    real,
                    predicted,
                });
            }
        }
        Ok(records)
    }
}
