//! Константы предметной области

/// Полный словарь целевых метрик (eb = eggbeater kick, bb = body boost).
/// Разность множеств колонок с этим списком дает набор переменных.
pub const AVAILABLE_TARGETS: [&str; 9] = [
    "eb max force",
    "eb mean force",
    "eb sd force",
    "eb max height",
    "eb min height",
    "eb mean height",
    "eb sd height",
    "eb max-min height",
    "bb",
];

/// Цели по умолчанию для панели предсказаний
pub const DEFAULT_TARGETS: [&str; 3] = ["bb", "eb mean height", "eb mean force"];

/// Зерно по умолчанию; передается явно, глобальное состояние не трогаем
pub const RANDOM_SEED: u64 = 42;

/// Маркеры сторон в именах силовых колонок ("ADD/L", "ADD/R")
pub const SIDE_DELIMITER: char = '/';
pub const LEFT_SUFFIX: &str = "/L";
pub const RIGHT_SUFFIX: &str = "/R";
