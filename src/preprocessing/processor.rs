//! Оркестрация обработки силовых данных

use serde::{Deserialize, Serialize};

use crate::constants::{LEFT_SUFFIX, RIGHT_SUFFIX, SIDE_DELIMITER};
use crate::error::{AquaError, Result};
use crate::preprocessing::{
    AggregationStrategy, ForceAggregator, ForceNormalizer, NormalizationStrategy,
};
use crate::types::DataTable;

/// Опции панели обработки данных
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingOptions {
    pub normalization: NormalizationStrategy,
    pub aggregation: AggregationStrategy,
    /// Считать ли дисбаланс левой и правой стороны
    pub imbalance: bool,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            normalization: NormalizationStrategy::None,
            aggregation: AggregationStrategy::FScore,
            imbalance: true,
        }
    }
}

pub struct ForceProcessor;

impl ForceProcessor {
    /// Сырая широкая таблица -> таблица признаков:
    /// нормализация силовых колонок, разбор на стороны, агрегация,
    /// опциональный дисбаланс, затем join на остаток таблицы
    /// (антропометрия и цели не трогаются).
    pub fn process(data: &DataTable, options: &ProcessingOptions) -> Result<DataTable> {
        data.ensure_rectangular()?;

        let raw_forces = data.filter(|name| name.contains(SIDE_DELIMITER));
        let forces = ForceNormalizer::normalize(&raw_forces, data, options.normalization)?;

        let (left, right) = Self::split_sides(&forces)?;

        let mut processed = ForceAggregator::aggregate(&left, &right, options.aggregation)?;
        if options.imbalance {
            processed = processed.join(&ForceAggregator::imbalance(&left, &right)?);
        }

        let force_names = raw_forces.names();
        Ok(data.drop_columns(&force_names).join(&processed))
    }

    /// Разбор силовых колонок на левую и правую таблицы со срезанным
    /// суффиксом. Непарный канал или неизвестный суффикс — фатальная
    /// ошибка формы данных с именем колонки.
    fn split_sides(forces: &DataTable) -> Result<(DataTable, DataTable)> {
        let strip = |name: &str| name[..name.len() - 2].to_string();
        let left = forces.filter(|name| name.ends_with(LEFT_SUFFIX)).rename(strip);
        let right = forces.filter(|name| name.ends_with(RIGHT_SUFFIX)).rename(strip);

        for column in &forces.columns {
            if !column.name.ends_with(LEFT_SUFFIX) && !column.name.ends_with(RIGHT_SUFFIX) {
                return Err(AquaError::DataShape(format!(
                    "force column `{}` has no side suffix",
                    column.name
                )));
            }
        }
        for channel in left.names() {
            if !right.has_column(channel) {
                return Err(AquaError::DataShape(format!(
                    "force column `{channel}{LEFT_SUFFIX}` has no right counterpart"
                )));
            }
        }
        for channel in right.names() {
            if !left.has_column(channel) {
                return Err(AquaError::DataShape(format!(
                    "force column `{channel}{RIGHT_SUFFIX}` has no left counterpart"
                )));
            }
        }

        Ok((left, right))
    }
}
