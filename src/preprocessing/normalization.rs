//! Нормализация силовых данных по антропометрии

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AquaError, Result};
use crate::types::DataTable;

/// Стратегия нормализации: делитель для всех силовых колонок.
/// IMC = indice de masse corporelle (BMI), Weight / Height^2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizationStrategy {
    None,
    Weight,
    #[serde(rename = "Weight x Height")]
    WeightHeight,
    #[serde(rename = "IMC")]
    Imc,
}

impl NormalizationStrategy {
    pub const ALL: [NormalizationStrategy; 4] = [
        NormalizationStrategy::None,
        NormalizationStrategy::Weight,
        NormalizationStrategy::WeightHeight,
        NormalizationStrategy::Imc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizationStrategy::None => "None",
            NormalizationStrategy::Weight => "Weight",
            NormalizationStrategy::WeightHeight => "Weight x Height",
            NormalizationStrategy::Imc => "IMC",
        }
    }
}

impl fmt::Display for NormalizationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NormalizationStrategy {
    type Err = AquaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "None" => Ok(NormalizationStrategy::None),
            "Weight" => Ok(NormalizationStrategy::Weight),
            "Weight x Height" => Ok(NormalizationStrategy::WeightHeight),
            "IMC" => Ok(NormalizationStrategy::Imc),
            other => Err(AquaError::Configuration(format!(
                "{other} is not a force normalization strategy"
            ))),
        }
    }
}

pub struct ForceNormalizer;

impl ForceNormalizer {
    /// Построчное деление всех силовых колонок на делитель стратегии.
    /// Делитель берется из полной таблицы (колонки Weight / Height).
    /// Нулевой делитель не перехватывается: inf/NaN уходят дальше по пайплайну.
    pub fn normalize(
        forces: &DataTable,
        data: &DataTable,
        strategy: NormalizationStrategy,
    ) -> Result<DataTable> {
        let divisor = match strategy {
            NormalizationStrategy::None => return Ok(forces.clone()),
            NormalizationStrategy::Weight => data.column("Weight")?.to_vec(),
            NormalizationStrategy::WeightHeight => {
                let weight = data.column("Weight")?;
                let height = data.column("Height")?;
                weight.iter().zip(height).map(|(w, h)| w * h).collect()
            }
            NormalizationStrategy::Imc => {
                let weight = data.column("Weight")?;
                let height = data.column("Height")?;
                weight.iter().zip(height).map(|(w, h)| w / (h * h)).collect()
            }
        };

        let mut normalized = forces.clone();
        for column in &mut normalized.columns {
            for (value, d) in column.values.iter_mut().zip(&divisor) {
                *value /= d;
            }
        }
        Ok(normalized)
    }
}
