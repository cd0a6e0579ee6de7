/// Регрессионные модели

pub mod bank;
pub mod boosting;
pub mod forest;
pub mod linear;
pub mod tree;

pub use bank::{ModelBank, ModelKind, Regressor};
pub use boosting::GradientBoostingRegressor;
pub use forest::RandomForestRegressor;
pub use linear::{LassoRegression, LinearModel, RidgeRegression};
pub use tree::{RegressionTree, TreeParams};
