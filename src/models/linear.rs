//! Линейные модели: OLS (linfa), Ridge и Lasso

#![allow(non_snake_case)]

use linfa::prelude::*;
use linfa_linear::{FittedLinearRegression, LinearRegression};
use ndarray::{Array1, Array2, Axis};

use crate::error::{AquaError, Result};
use crate::models::bank::Regressor;

enum FittedLinear {
    Ols(FittedLinearRegression<f64>),
    /// Вырожденная матрица признаков: МНК через нормальные уравнения
    /// с крошечным гребнем
    Degenerate(RidgeRegression),
}

/// Обертка над linfa OLS
pub struct LinearModel {
    fitted: Option<FittedLinear>,
}

impl LinearModel {
    pub fn new() -> Self {
        Self { fitted: None }
    }
}

impl Default for LinearModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Regressor for LinearModel {
    fn fit(&mut self, X: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let dataset = Dataset::new(X.clone(), y.clone());
        // Коллинеарные колонки (например постоянный Weight) делают
        // X^T X необратимой; валидные данные не должны ронять прогон
        let fitted = match LinearRegression::new().fit(&dataset) {
            Ok(fitted) => FittedLinear::Ols(fitted),
            Err(e) => {
                tracing::debug!("OLS fit failed ({e}), solving least squares instead");
                let mut fallback = RidgeRegression::new(1e-8);
                fallback.fit(X, y)?;
                FittedLinear::Degenerate(fallback)
            }
        };
        self.fitted = Some(fitted);
        Ok(())
    }

    fn predict(&self, X: &Array2<f64>) -> Result<Array1<f64>> {
        match self.fitted.as_ref() {
            Some(FittedLinear::Ols(fitted)) => Ok(fitted.predict(X)),
            Some(FittedLinear::Degenerate(fitted)) => fitted.predict(X),
            None => Err(AquaError::Model(
                "linear regression is not fitted".to_string(),
            )),
        }
    }
}

/// Ridge Regression через нормальные уравнения:
/// (Xc^T Xc + αI) w = Xc^T yc на центрированных данных
pub struct RidgeRegression {
    alpha: f64,
    weights: Option<Array1<f64>>,
    bias: f64,
}

impl RidgeRegression {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            weights: None,
            bias: 0.0,
        }
    }
}

impl Regressor for RidgeRegression {
    fn fit(&mut self, X: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_samples = X.nrows();
        let n_features = X.ncols();
        if n_samples == 0 || n_features == 0 {
            return Err(AquaError::Model("empty training set".to_string()));
        }

        let x_mean = X
            .mean_axis(Axis(0))
            .ok_or_else(|| AquaError::Model("empty training set".to_string()))?;
        let y_mean = y.mean().unwrap_or(0.0);

        let Xc = X - &x_mean;
        let yc = y - y_mean;

        let mut xtx = Xc.t().dot(&Xc);
        for i in 0..n_features {
            xtx[[i, i]] += self.alpha;
        }
        let xty = Xc.t().dot(&yc);

        let weights = solve_linear_system(&xtx, &xty)?;
        self.bias = y_mean - x_mean.dot(&weights);
        self.weights = Some(weights);
        Ok(())
    }

    fn predict(&self, X: &Array2<f64>) -> Result<Array1<f64>> {
        let weights = self
            .weights
            .as_ref()
            .ok_or_else(|| AquaError::Model("ridge regression is not fitted".to_string()))?;
        Ok(X.dot(weights) + self.bias)
    }
}

/// Lasso через покоординатный спуск с мягким порогом
pub struct LassoRegression {
    alpha: f64,
    max_iter: usize,
    tol: f64,
    weights: Option<Array1<f64>>,
    bias: f64,
}

impl LassoRegression {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            max_iter: 1000,
            tol: 1e-6,
            weights: None,
            bias: 0.0,
        }
    }
}

impl Regressor for LassoRegression {
    fn fit(&mut self, X: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_samples = X.nrows();
        let n_features = X.ncols();
        if n_samples == 0 || n_features == 0 {
            return Err(AquaError::Model("empty training set".to_string()));
        }

        // Порог в масштабе sklearn: штраф умножается на число строк
        let lambda = self.alpha * n_samples as f64;
        let col_norms: Vec<f64> = (0..n_features)
            .map(|j| X.column(j).iter().map(|v| v * v).sum())
            .collect();

        let mut weights: Array1<f64> = Array1::zeros(n_features);
        let mut bias = y.mean().unwrap_or(0.0);
        // Остаток r = y - Xw - b поддерживается инкрементально
        let mut residual = y - bias;

        for _ in 0..self.max_iter {
            let mut max_delta = 0.0_f64;

            for j in 0..n_features {
                if col_norms[j] == 0.0 {
                    continue;
                }
                let column = X.column(j);
                // Вклад j-й координаты возвращается в остаток
                let rho: f64 = column
                    .iter()
                    .zip(residual.iter())
                    .map(|(x, r)| x * (r + x * weights[j]))
                    .sum();
                let updated = soft_threshold(rho, lambda) / col_norms[j];
                let delta = updated - weights[j];
                if delta != 0.0 {
                    residual = residual - &(&column * delta);
                    weights[j] = updated;
                    max_delta = max_delta.max(delta.abs());
                }
            }

            let bias_shift = residual.mean().unwrap_or(0.0);
            bias += bias_shift;
            residual -= bias_shift;
            max_delta = max_delta.max(bias_shift.abs());

            if max_delta < self.tol {
                break;
            }
        }

        self.weights = Some(weights);
        self.bias = bias;
        Ok(())
    }

    fn predict(&self, X: &Array2<f64>) -> Result<Array1<f64>> {
        let weights = self
            .weights
            .as_ref()
            .ok_or_else(|| AquaError::Model("lasso regression is not fitted".to_string()))?;
        Ok(X.dot(weights) + self.bias)
    }
}

fn soft_threshold(value: f64, threshold: f64) -> f64 {
    if value > threshold {
        value - threshold
    } else if value < -threshold {
        value + threshold
    } else {
        0.0
    }
}

/// Метод Гаусса с частичным выбором ведущего элемента
fn solve_linear_system(A: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let n = A.nrows();
    let mut augmented = Array2::zeros((n, n + 1));
    for i in 0..n {
        for j in 0..n {
            augmented[[i, j]] = A[[i, j]];
        }
        augmented[[i, n]] = b[i];
    }

    for i in 0..n {
        let mut max_row = i;
        let mut max_val = augmented[[i, i]].abs();
        for k in (i + 1)..n {
            if augmented[[k, i]].abs() > max_val {
                max_val = augmented[[k, i]].abs();
                max_row = k;
            }
        }
        if max_row != i {
            for j in 0..=n {
                let tmp = augmented[[i, j]];
                augmented[[i, j]] = augmented[[max_row, j]];
                augmented[[max_row, j]] = tmp;
            }
        }

        let pivot = augmented[[i, i]];
        if pivot.abs() < 1e-12 {
            return Err(AquaError::Model(
                "singular matrix in ridge normal equations".to_string(),
            ));
        }
        for k in (i + 1)..n {
            let factor = augmented[[k, i]] / pivot;
            for j in i..=n {
                augmented[[k, j]] -= factor * augmented[[i, j]];
            }
        }
    }

    let mut solution = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = augmented[[i, n]];
        for j in (i + 1)..n {
            sum -= augmented[[i, j]] * solution[j];
        }
        solution[i] = sum / augmented[[i, i]];
    }
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn line_data() -> (Array2<f64>, Array1<f64>) {
        // y = 2x + 1
        let X = array![[0.0], [1.0], [2.0], [3.0], [4.0]];
        let y = array![1.0, 3.0, 5.0, 7.0, 9.0];
        (X, y)
    }

    #[test]
    fn linear_model_recovers_an_exact_line() {
        let (X, y) = line_data();
        let mut model = LinearModel::new();
        model.fit(&X, &y).unwrap();
        let pred = model.predict(&array![[5.0]]).unwrap();
        assert!((pred[0] - 11.0).abs() < 1e-8);
    }

    #[test]
    fn linear_model_survives_a_constant_feature_column() {
        // Постоянная колонка (Weight одной группы) делает X^T X вырожденной
        let X = array![[0.0, 1.7], [1.0, 1.7], [2.0, 1.7], [3.0, 1.7]];
        let y = array![1.0, 3.0, 5.0, 7.0];
        let mut model = LinearModel::new();
        model.fit(&X, &y).unwrap();
        let pred = model.predict(&array![[4.0, 1.7]]).unwrap();
        assert!((pred[0] - 9.0).abs() < 1e-4, "predicted {}", pred[0]);
    }

    #[test]
    fn linear_model_survives_duplicated_feature_columns() {
        let X = array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let y = array![1.0, 3.0, 5.0, 7.0];
        let mut model = LinearModel::new();
        model.fit(&X, &y).unwrap();
        let pred = model.predict(&array![[4.0, 4.0]]).unwrap();
        assert!((pred[0] - 9.0).abs() < 1e-4, "predicted {}", pred[0]);
    }

    #[test]
    fn ridge_with_tiny_penalty_is_close_to_ols() {
        let (X, y) = line_data();
        let mut model = RidgeRegression::new(1e-8);
        model.fit(&X, &y).unwrap();
        let pred = model.predict(&array![[5.0]]).unwrap();
        assert!((pred[0] - 11.0).abs() < 1e-6);
    }

    #[test]
    fn lasso_with_tiny_penalty_is_close_to_ols() {
        let (X, y) = line_data();
        let mut model = LassoRegression::new(1e-6);
        model.fit(&X, &y).unwrap();
        let pred = model.predict(&array![[5.0]]).unwrap();
        assert!((pred[0] - 11.0).abs() < 1e-3);
    }

    #[test]
    fn lasso_with_huge_penalty_collapses_to_the_mean() {
        let (X, y) = line_data();
        let mut model = LassoRegression::new(1e6);
        model.fit(&X, &y).unwrap();
        let pred = model.predict(&X).unwrap();
        for p in pred.iter() {
            assert!((p - 5.0).abs() < 1e-6);
        }
    }

    #[test]
    fn predict_before_fit_is_a_model_error() {
        let model = RidgeRegression::new(1.0);
        assert!(model.predict(&array![[1.0]]).is_err());
    }
}
