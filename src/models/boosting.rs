//! Градиентный бустинг над неглубокими деревьями (квадратичная потеря)

#![allow(non_snake_case)]

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{AquaError, Result};
use crate::models::bank::Regressor;
use crate::models::tree::{RegressionTree, TreeParams};

pub struct GradientBoostingRegressor {
    n_estimators: usize,
    learning_rate: f64,
    seed: u64,
    init: f64,
    trees: Vec<RegressionTree>,
    fitted: bool,
}

impl GradientBoostingRegressor {
    pub fn new(seed: u64) -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            seed,
            init: 0.0,
            trees: Vec::new(),
            fitted: false,
        }
    }

    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }
}

impl Regressor for GradientBoostingRegressor {
    fn fit(&mut self, X: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_samples = X.nrows();
        if n_samples == 0 || X.ncols() == 0 {
            return Err(AquaError::Model("empty training set".to_string()));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let params = TreeParams {
            max_depth: 3,
            ..TreeParams::default()
        };
        let indices: Vec<usize> = (0..n_samples).collect();

        // Старт с константы, дальше каждая ступень учится на остатках
        self.init = y.mean().unwrap_or(0.0);
        self.trees.clear();
        let mut residual = y - self.init;

        for _ in 0..self.n_estimators {
            let mut tree = RegressionTree::new(params.clone());
            tree.grow(X, &residual, &indices, &mut rng)?;
            let step = tree.predict(X)?;
            residual = residual - &(step * self.learning_rate);
            self.trees.push(tree);
        }

        self.fitted = true;
        Ok(())
    }

    fn predict(&self, X: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.fitted {
            return Err(AquaError::Model(
                "gradient boosting is not fitted".to_string(),
            ));
        }
        let mut prediction = Array1::from_elem(X.nrows(), self.init);
        for tree in &self.trees {
            prediction = prediction + tree.predict(X)? * self.learning_rate;
        }
        Ok(prediction)
    }
}
