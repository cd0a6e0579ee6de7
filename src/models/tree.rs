//! Регрессионное дерево: жадные разбиения по уменьшению дисперсии

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{AquaError, Result};

#[derive(Debug, Clone)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Размер случайного подмножества признаков на разбиение (для леса)
    pub max_features: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 8,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

#[derive(Debug, Clone)]
enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

#[derive(Debug, Clone)]
pub struct RegressionTree {
    params: TreeParams,
    root: Option<TreeNode>,
}

impl RegressionTree {
    pub fn new(params: TreeParams) -> Self {
        Self { params, root: None }
    }

    /// Обучение на подмножестве строк (для бутстрапа леса — с повторами)
    pub fn grow(
        &mut self,
        X: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        rng: &mut StdRng,
    ) -> Result<()> {
        if indices.is_empty() || X.ncols() == 0 {
            return Err(AquaError::Model("empty training set".to_string()));
        }
        self.root = Some(self.build_node(X, y, indices, 0, rng));
        Ok(())
    }

    pub fn predict_row(&self, row: ArrayView1<f64>) -> Result<f64> {
        let mut node = self
            .root
            .as_ref()
            .ok_or_else(|| AquaError::Model("regression tree is not fitted".to_string()))?;
        loop {
            match node {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    // NaN в признаке уходит в правую ветку
                    node = if row[*feature] < *threshold { left } else { right };
                }
            }
        }
    }

    pub fn predict(&self, X: &Array2<f64>) -> Result<Array1<f64>> {
        let mut predictions = Array1::zeros(X.nrows());
        for (i, row) in X.rows().into_iter().enumerate() {
            predictions[i] = self.predict_row(row)?;
        }
        Ok(predictions)
    }

    fn build_node(
        &self,
        X: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        depth: usize,
        rng: &mut StdRng,
    ) -> TreeNode {
        let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64;

        if depth >= self.params.max_depth || indices.len() < self.params.min_samples_split {
            return TreeNode::Leaf { value: mean };
        }

        let features = self.candidate_features(X.ncols(), rng);
        match self.best_split(X, y, indices, &features) {
            Some((feature, threshold, left_idx, right_idx)) => TreeNode::Split {
                feature,
                threshold,
                left: Box::new(self.build_node(X, y, &left_idx, depth + 1, rng)),
                right: Box::new(self.build_node(X, y, &right_idx, depth + 1, rng)),
            },
            None => TreeNode::Leaf { value: mean },
        }
    }

    fn candidate_features(&self, n_features: usize, rng: &mut StdRng) -> Vec<usize> {
        let mut features: Vec<usize> = (0..n_features).collect();
        if let Some(max_features) = self.params.max_features {
            features.shuffle(rng);
            features.truncate(max_features.max(1).min(n_features));
        }
        features
    }

    /// Лучшее разбиение по сумме квадратов отклонений обеих сторон.
    /// Пороги — середины между соседними различными значениями признака.
    fn best_split(
        &self,
        X: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        features: &[usize],
    ) -> Option<(usize, f64, Vec<usize>, Vec<usize>)> {
        let n = indices.len();
        let min_leaf = self.params.min_samples_leaf;
        let mut best: Option<(f64, usize, f64)> = None;

        for &feature in features {
            let mut sorted: Vec<(f64, f64)> =
                indices.iter().map(|&i| (X[[i, feature]], y[i])).collect();
            sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

            let total_sum: f64 = sorted.iter().map(|(_, t)| t).sum();
            let total_sq: f64 = sorted.iter().map(|(_, t)| t * t).sum();

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for k in 1..n {
                left_sum += sorted[k - 1].1;
                left_sq += sorted[k - 1].1 * sorted[k - 1].1;

                if sorted[k].0 <= sorted[k - 1].0 {
                    continue;
                }
                if k < min_leaf || n - k < min_leaf {
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse_left = left_sq - left_sum * left_sum / k as f64;
                let sse_right = right_sq - right_sum * right_sum / (n - k) as f64;
                let score = sse_left + sse_right;

                if best.map_or(true, |(s, _, _)| score < s) {
                    let threshold = (sorted[k - 1].0 + sorted[k].0) / 2.0;
                    best = Some((score, feature, threshold));
                }
            }
        }

        let (_, feature, threshold) = best?;
        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| X[[i, feature]] < threshold);
        Some((feature, threshold, left_idx, right_idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;

    #[test]
    fn tree_recovers_a_step_function_exactly() {
        let X = array![[0.1], [0.2], [0.3], [0.7], [0.8], [0.9]];
        let y = array![1.0, 1.0, 1.0, 5.0, 5.0, 5.0];
        let indices: Vec<usize> = (0..6).collect();
        let mut rng = StdRng::seed_from_u64(42);

        let mut tree = RegressionTree::new(TreeParams::default());
        tree.grow(&X, &y, &indices, &mut rng).unwrap();

        let pred = tree.predict(&array![[0.0], [1.0]]).unwrap();
        assert_eq!(pred[0], 1.0);
        assert_eq!(pred[1], 5.0);
    }

    #[test]
    fn constant_target_yields_a_single_leaf() {
        let X = array![[1.0], [2.0], [3.0]];
        let y = array![4.0, 4.0, 4.0];
        let indices: Vec<usize> = (0..3).collect();
        let mut rng = StdRng::seed_from_u64(0);

        let mut tree = RegressionTree::new(TreeParams::default());
        tree.grow(&X, &y, &indices, &mut rng).unwrap();
        let pred = tree.predict(&array![[10.0]]).unwrap();
        assert_eq!(pred[0], 4.0);
    }

    #[test]
    fn min_samples_leaf_blocks_tiny_splits() {
        let X = array![[0.0], [1.0], [2.0], [3.0]];
        let y = array![0.0, 0.0, 0.0, 10.0];
        let indices: Vec<usize> = (0..4).collect();
        let mut rng = StdRng::seed_from_u64(0);

        let params = TreeParams {
            min_samples_leaf: 2,
            ..TreeParams::default()
        };
        let mut tree = RegressionTree::new(params);
        tree.grow(&X, &y, &indices, &mut rng).unwrap();

        // Лист не может быть меньше двух образцов, выброс не изолируется
        let pred = tree.predict(&array![[3.0]]).unwrap();
        assert!(pred[0] < 10.0);
    }

    #[test]
    fn predict_before_grow_is_a_model_error() {
        let tree = RegressionTree::new(TreeParams::default());
        assert!(tree.predict(&array![[1.0]]).is_err());
    }
}
