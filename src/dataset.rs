//! Разбиение данных: переменные/цели и train/test

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::constants::AVAILABLE_TARGETS;
use crate::error::{AquaError, Result};
use crate::types::DataTable;

/// Таблицы переменных и целей одного разбиения
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: DataTable,
    pub x_test: DataTable,
    pub y_train: DataTable,
    pub y_test: DataTable,
}

/// Выделение целей и переменных из обработанной таблицы.
/// Цели выбираются по списку пользователя; переменные — разность
/// множеств с полным словарем целей, а не с выбранным подмножеством,
/// чтобы невыбранные цели не утекали в признаки.
pub fn variables_targets_split(
    data: &DataTable,
    targets: &[String],
) -> Result<(DataTable, DataTable)> {
    let target_table = data.select(targets)?;
    let variables = data.drop_columns(&AVAILABLE_TARGETS);
    Ok((target_table, variables))
}

/// Детерминированное случайное разбиение строк на train и test
pub struct DatasetSplitter {
    seed: u64,
}

impl DatasetSplitter {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// test_size — целый процент в [0, 100]. Перемешивание индексов
    /// одним засеянным генератором: одно и то же зерно, доля и число
    /// строк всегда дают одно и то же разбиение. X и y делятся одними
    /// индексами, соответствие строк сохраняется.
    pub fn split(
        &self,
        variables: &DataTable,
        targets: &DataTable,
        test_size: u32,
    ) -> Result<TrainTestSplit> {
        variables.ensure_rectangular()?;
        targets.ensure_rectangular()?;
        if targets.n_rows() != variables.n_rows() {
            return Err(AquaError::DataShape(format!(
                "targets table has {} rows, variables table has {}",
                targets.n_rows(),
                variables.n_rows()
            )));
        }

        if test_size > 100 {
            return Err(AquaError::Configuration(format!(
                "{test_size} is not a valid test size percentage (expected 0..=100)"
            )));
        }

        let n_rows = variables.n_rows();
        let n_test = (n_rows as f64 * test_size as f64 / 100.0).ceil() as usize;
        let n_train = n_rows - n_test;
        if n_test == 0 || n_train == 0 {
            return Err(AquaError::Configuration(format!(
                "test size of {test_size}% over {n_rows} rows leaves an empty split \
                 ({n_train} train / {n_test} test)"
            )));
        }

        let mut indices: Vec<usize> = (0..n_rows).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);

        let (test_idx, train_idx) = indices.split_at(n_test);
        Ok(TrainTestSplit {
            x_train: variables.take_rows(train_idx),
            x_test: variables.take_rows(test_idx),
            y_train: targets.take_rows(train_idx),
            y_test: targets.take_rows(test_idx),
        })
    }
}
