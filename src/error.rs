//! Ошибки пайплайна

use thiserror::Error;

/// Все фатальные ошибки пайплайна. Числовые аномалии (деление на ноль,
/// NaN в F-score) ошибками не являются и распространяются как значения.
#[derive(Debug, Error)]
pub enum AquaError {
    /// Неизвестная стратегия, неизвестная модель или параметр вне диапазона
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Отсутствующая колонка или непарная силовая колонка
    #[error("data shape error: {0}")]
    DataShape(String),

    /// Ошибка обучения или применения модели
    #[error("model error: {0}")]
    Model(String),
}

pub type Result<T> = std::result::Result<T, AquaError>;
