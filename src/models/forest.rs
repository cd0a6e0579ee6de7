//! Случайный лес: бэггинг регрессионных деревьев

#![allow(non_snake_case)]

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{AquaError, Result};
use crate::models::bank::Regressor;
use crate::models::tree::{RegressionTree, TreeParams};

pub struct RandomForestRegressor {
    n_trees: usize,
    seed: u64,
    trees: Vec<RegressionTree>,
}

impl RandomForestRegressor {
    pub fn new(seed: u64) -> Self {
        Self {
            n_trees: 100,
            seed,
            trees: Vec::new(),
        }
    }

    pub fn with_n_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }
}

impl Regressor for RandomForestRegressor {
    fn fit(&mut self, X: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_samples = X.nrows();
        if n_samples == 0 || X.ncols() == 0 {
            return Err(AquaError::Model("empty training set".to_string()));
        }

        // Одно зерно на весь лес: и бутстрап, и выбор признаков
        let mut rng = StdRng::seed_from_u64(self.seed);
        let params = TreeParams {
            max_features: Some(((X.ncols() as f64).sqrt().ceil() as usize).max(1)),
            ..TreeParams::default()
        };

        self.trees.clear();
        for _ in 0..self.n_trees {
            let bootstrap: Vec<usize> =
                (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();
            let mut tree = RegressionTree::new(params.clone());
            tree.grow(X, y, &bootstrap, &mut rng)?;
            self.trees.push(tree);
        }
        Ok(())
    }

    fn predict(&self, X: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(AquaError::Model("random forest is not fitted".to_string()));
        }
        let mut sum = Array1::zeros(X.nrows());
        for tree in &self.trees {
            sum = sum + tree.predict(X)?;
        }
        Ok(sum / self.trees.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn step_data() -> (Array2<f64>, Array1<f64>) {
        let X = array![
            [0.1],
            [0.15],
            [0.2],
            [0.25],
            [0.3],
            [0.7],
            [0.75],
            [0.8],
            [0.85],
            [0.9]
        ];
        let y = array![1.0, 1.0, 1.0, 1.0, 1.0, 5.0, 5.0, 5.0, 5.0, 5.0];
        (X, y)
    }

    #[test]
    fn forest_separates_the_two_plateaus() {
        let (X, y) = step_data();
        let mut forest = RandomForestRegressor::new(42).with_n_trees(30);
        forest.fit(&X, &y).unwrap();

        let pred = forest.predict(&array![[0.1], [0.9]]).unwrap();
        assert!(pred[0] < 2.0, "low plateau predicted {}", pred[0]);
        assert!(pred[1] > 4.0, "high plateau predicted {}", pred[1]);
    }

    #[test]
    fn same_seed_gives_identical_predictions() {
        let (X, y) = step_data();
        let mut first = RandomForestRegressor::new(7).with_n_trees(10);
        let mut second = RandomForestRegressor::new(7).with_n_trees(10);
        first.fit(&X, &y).unwrap();
        second.fit(&X, &y).unwrap();
        assert_eq!(first.predict(&X).unwrap(), second.predict(&X).unwrap());
    }

    #[test]
    fn predict_before_fit_is_a_model_error() {
        let forest = RandomForestRegressor::new(0);
        assert!(forest.predict(&array![[1.0]]).is_err());
    }
}
