//! Агрегация левой и правой стороны в один признак на канал

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AquaError, Result};
use crate::types::DataTable;

/// Стратегия объединения пары L/R в один признак
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationStrategy {
    /// 2 * L * R / (L + R), NaN при L + R = 0
    #[serde(rename = "F-score")]
    FScore,
    /// (L + R) / 2
    Mean,
}

impl AggregationStrategy {
    pub const ALL: [AggregationStrategy; 2] =
        [AggregationStrategy::FScore, AggregationStrategy::Mean];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationStrategy::FScore => "F-score",
            AggregationStrategy::Mean => "Mean",
        }
    }
}

impl fmt::Display for AggregationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationStrategy {
    type Err = AquaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "F-score" => Ok(AggregationStrategy::FScore),
            "Mean" => Ok(AggregationStrategy::Mean),
            other => Err(AquaError::Configuration(format!(
                "{other} is not an aggregation strategy"
            ))),
        }
    }
}

pub struct ForceAggregator;

impl ForceAggregator {
    /// Поколоночное объединение; таблицы уже без суффиксов сторон и с
    /// одинаковыми именами каналов. Имена выходных колонок получают
    /// префикс стратегии ("F-score ADD", "Mean ADD").
    pub fn aggregate(
        left: &DataTable,
        right: &DataTable,
        strategy: AggregationStrategy,
    ) -> Result<DataTable> {
        let combine: fn(f64, f64) -> f64 = match strategy {
            AggregationStrategy::FScore => |l, r| 2.0 * (l * r) / (l + r),
            AggregationStrategy::Mean => |l, r| (l + r) / 2.0,
        };
        Ok(Self::combine_sides(left, right, combine)?
            .add_prefix(&format!("{} ", strategy.as_str())))
    }

    /// Дисбаланс |L - R| / L * 100. Знаменатель намеренно левый:
    /// левая конечность служит опорной, формула несимметрична.
    pub fn imbalance(left: &DataTable, right: &DataTable) -> Result<DataTable> {
        Ok(Self::combine_sides(left, right, |l, r| ((l - r) / l).abs() * 100.0)?
            .add_prefix("Imb "))
    }

    fn combine_sides(
        left: &DataTable,
        right: &DataTable,
        combine: fn(f64, f64) -> f64,
    ) -> Result<DataTable> {
        let mut combined = DataTable::new();
        for column in &left.columns {
            let right_values = right.column(&column.name)?;
            let values = column
                .values
                .iter()
                .zip(right_values)
                .map(|(&l, &r)| combine(l, r))
                .collect();
            combined.push_column(column.name.clone(), values);
        }
        Ok(combined)
    }
}
