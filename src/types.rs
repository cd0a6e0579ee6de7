/// Типы данных для пайплайна

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{AquaError, Result};

/// Одна числовая колонка широкой таблицы испытаний
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

/// Широкая таблица: строки = испытания, колонки = силы / антропометрия / цели.
/// Порядок колонок сохраняется, все операции возвращают новую таблицу.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DataTable {
    pub columns: Vec<Column>,
}

impl DataTable {
    pub fn new() -> Self {
        Self { columns: Vec::new() }
    }

    pub fn from_columns(columns: Vec<(&str, Vec<f64>)>) -> Self {
        Self {
            columns: columns
                .into_iter()
                .map(|(name, values)| Column {
                    name: name.to_string(),
                    values,
                })
                .collect(),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0 || self.columns.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Значения колонки; отсутствие колонки — ошибка формы данных
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| {
                AquaError::DataShape(format!("column `{name}` is missing from the dataset"))
            })
    }

    /// Все колонки обязаны быть одной длины. Рваная таблица из
    /// внешнего JSON — ошибка формы данных с именем колонки-нарушителя,
    /// а не паника или молчаливое усечение.
    pub fn ensure_rectangular(&self) -> Result<()> {
        let expected = self.n_rows();
        for column in &self.columns {
            if column.values.len() != expected {
                return Err(AquaError::DataShape(format!(
                    "column `{}` has {} rows, expected {}",
                    column.name,
                    column.values.len(),
                    expected
                )));
            }
        }
        Ok(())
    }

    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.columns.push(Column {
            name: name.into(),
            values,
        });
    }

    /// Колонки, имя которых удовлетворяет предикату (аналог filter(like=...))
    pub fn filter<F: Fn(&str) -> bool>(&self, predicate: F) -> DataTable {
        DataTable {
            columns: self
                .columns
                .iter()
                .filter(|c| predicate(&c.name))
                .cloned()
                .collect(),
        }
    }

    /// Переименование всех колонок
    pub fn rename<F: Fn(&str) -> String>(&self, rename: F) -> DataTable {
        DataTable {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: rename(&c.name),
                    values: c.values.clone(),
                })
                .collect(),
        }
    }

    pub fn add_prefix(&self, prefix: &str) -> DataTable {
        self.rename(|name| format!("{prefix}{name}"))
    }

    /// Подтаблица из перечисленных колонок, в заданном порядке
    pub fn select(&self, names: &[String]) -> Result<DataTable> {
        let mut selected = DataTable::new();
        for name in names {
            selected.push_column(name.clone(), self.column(name)?.to_vec());
        }
        Ok(selected)
    }

    /// Разность множеств по именам: остаются колонки, которых нет в списке
    pub fn drop_columns(&self, names: &[&str]) -> DataTable {
        self.filter(|name| !names.contains(&name))
    }

    /// Присоединение колонок другой таблицы справа
    pub fn join(&self, other: &DataTable) -> DataTable {
        let mut joined = self.clone();
        joined.columns.extend(other.columns.iter().cloned());
        joined
    }

    /// Подтаблица из строк с заданными индексами
    pub fn take_rows(&self, indices: &[usize]) -> DataTable {
        DataTable {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: indices.iter().map(|&i| c.values[i]).collect(),
                })
                .collect(),
        }
    }

    /// Матрица признаков (строки x колонки) для моделей
    pub fn to_matrix(&self) -> Array2<f64> {
        let mut matrix = Array2::zeros((self.n_rows(), self.n_cols()));
        for (j, column) in self.columns.iter().enumerate() {
            for (i, &value) in column.values.iter().enumerate() {
                matrix[[i, j]] = value;
            }
        }
        matrix
    }

    /// Одна колонка как вектор целей
    pub fn column_vector(&self, name: &str) -> Result<Array1<f64>> {
        Ok(Array1::from(self.column(name)?.to_vec()))
    }
}

/// Одно предсказание: (цель, факт, прогноз)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub target: String,
    pub real: f64,
    pub predicted: f64,
}

/// Предсказание с метриками ошибок
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatedPrediction {
    pub target: String,
    pub real: f64,
    pub predicted: f64,
    /// MAE: |real - predicted|
    pub absolute_error: f64,
    /// MAPE: |(real - predicted) / real| * 100, бесконечность при real = 0
    pub percent_error: f64,
}
