//! L2-regularized logistic regression.
//!
//! Minimizes `0.5 * ||w||^2 + C * sum_i s_i * logloss_i` (intercept not
//! penalized) with damped Newton steps. The problem is convex, so the optimum
//! is unique and independent of the starting point.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::{check_training_data, Classifier, FitError, FittedClassifier};

const DEFAULT_C: f64 = 1.0;
const DEFAULT_MAX_ITER: usize = 100;
const DEFAULT_TOL: f64 = 1e-8;

/// Armijo sufficient-decrease constant
const ARMIJO: f64 = 1e-4;
const MAX_HALVINGS: usize = 40;

/// Per-class sample weighting during fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassWeight {
    /// Every sample weighs 1
    Uniform,
    /// `n / (2 * n_class)`, so both classes carry equal total weight
    #[default]
    Balanced,
}

impl ClassWeight {
    fn sample_weights(&self, y: &[u8]) -> Array1<f64> {
        match self {
            ClassWeight::Uniform => Array1::ones(y.len()),
            ClassWeight::Balanced => {
                let n = y.len() as f64;
                let positives = y.iter().filter(|&&label| label == 1).count() as f64;
                let negatives = n - positives;
                let w_pos = n / (2.0 * positives);
                let w_neg = n / (2.0 * negatives);
                y.iter()
                    .map(|&label| if label == 1 { w_pos } else { w_neg })
                    .collect()
            }
        }
    }
}

/// Unfitted logistic regression configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    /// Inverse regularization strength
    pub c: f64,
    pub class_weight: ClassWeight,
    pub max_iter: usize,
    /// Stop when the largest gradient component falls below this
    pub tol: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self {
            c: DEFAULT_C,
            class_weight: ClassWeight::Balanced,
            max_iter: DEFAULT_MAX_ITER,
            tol: DEFAULT_TOL,
        }
    }
}

impl LogisticRegression {
    pub fn balanced() -> Self {
        Self::default()
    }

    pub fn with_class_weight(mut self, class_weight: ClassWeight) -> Self {
        self.class_weight = class_weight;
        self
    }

    fn objective(
        &self,
        x1: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
        sw: ArrayView1<'_, f64>,
        theta: ArrayView1<'_, f64>,
    ) -> f64 {
        let d = theta.len() - 1;
        let z = x1.dot(&theta);
        let loss: f64 = z
            .iter()
            .zip(y.iter())
            .zip(sw.iter())
            .map(|((&z, &y), &s)| s * (softplus(z) - y * z))
            .sum();
        let penalty: f64 = theta.iter().take(d).map(|w| w * w).sum::<f64>() * 0.5;
        penalty + self.c * loss
    }
}

impl Classifier for LogisticRegression {
    type Fitted = LogisticModel;

    fn fit(self, x: ArrayView2<'_, f64>, y: &[u8]) -> Result<LogisticModel, FitError> {
        check_training_data(x, y)?;

        let (n, d) = x.dim();
        let x1 = with_intercept_column(x);
        let yf: Array1<f64> = y.iter().map(|&label| f64::from(label)).collect();
        let sw = self.class_weight.sample_weights(y);

        // theta = [w_0 .. w_{d-1}, b]
        let mut theta = Array1::<f64>::zeros(d + 1);
        let mut converged = false;
        let mut iterations = 0;

        for iter in 0..self.max_iter {
            iterations = iter + 1;

            let p = x1.dot(&theta).mapv(sigmoid);
            let residual = (&p - &yf) * &sw;

            let mut grad = x1.t().dot(&residual) * self.c;
            for j in 0..d {
                grad[j] += theta[j];
            }

            let grad_norm = grad.iter().fold(0.0_f64, |acc, g| acc.max(g.abs()));
            if grad_norm < self.tol {
                converged = true;
                break;
            }

            let curvature = p.mapv(|pi| pi * (1.0 - pi)) * &sw * self.c;
            let weighted = &x1 * &curvature.view().insert_axis(Axis(1));
            let mut hessian = x1.t().dot(&weighted);
            for j in 0..d {
                hessian[[j, j]] += 1.0;
            }

            let step = solve(hessian, grad.clone()).ok_or(FitError::Singular(iterations))?;

            // Backtracking line search on the objective
            let current = self.objective(x1.view(), yf.view(), sw.view(), theta.view());
            let slope = grad.dot(&step);
            let mut t = 1.0;
            let mut accepted = false;
            for _ in 0..MAX_HALVINGS {
                let candidate = &theta - &(&step * t);
                let value = self.objective(x1.view(), yf.view(), sw.view(), candidate.view());
                if value <= current - ARMIJO * t * slope {
                    theta = candidate;
                    accepted = true;
                    break;
                }
                t *= 0.5;
            }

            if !accepted {
                // No further decrease representable in f64
                converged = true;
                break;
            }
        }

        if converged {
            log::debug!(
                "logistic regression converged after {} iterations ({} rows)",
                iterations,
                n
            );
        } else {
            log::warn!(
                "logistic regression did not converge in {} iterations; keeping last iterate",
                self.max_iter
            );
        }

        Ok(LogisticModel {
            coef: theta.iter().take(d).copied().collect(),
            intercept: theta[d],
        })
    }
}

/// Fitted coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    /// Raw log-odds per row
    pub fn decision_function(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        assert_eq!(x.ncols(), self.coef.len(), "model expects {} columns", self.coef.len());
        let w = ArrayView1::from(&self.coef[..]);
        x.dot(&w) + self.intercept
    }
}

impl FittedClassifier for LogisticModel {
    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Vec<f64> {
        self.decision_function(x).iter().map(|&z| sigmoid(z)).collect()
    }

    fn validate_state(&self) -> Result<(), String> {
        if self.coef.is_empty() {
            return Err("logistic model has no coefficients".to_string());
        }
        if !self.intercept.is_finite() || self.coef.iter().any(|w| !w.is_finite()) {
            return Err("logistic model has non-finite coefficients".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// NUMERICS
// ============================================================================

/// Numerically stable logistic function
pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// log(1 + e^z) without overflow
fn softplus(z: f64) -> f64 {
    z.max(0.0) + (-z.abs()).exp().ln_1p()
}

fn with_intercept_column(x: ArrayView2<'_, f64>) -> Array2<f64> {
    let (n, d) = x.dim();
    let mut x1 = Array2::<f64>::ones((n, d + 1));
    x1.slice_mut(ndarray::s![.., ..d]).assign(&x);
    x1
}

/// Gaussian elimination with partial pivoting. `None` if singular.
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Option<Array1<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))?;
        if a[[pivot, col]].abs() < 1e-300 {
            return None;
        }
        if pivot != col {
            for k in 0..n {
                a.swap([col, k], [pivot, k]);
            }
            b.swap(col, pivot);
        }

        for row in col + 1..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut out = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[[row, k]] * out[k]).sum();
        out[row] = (b[row] - tail) / a[[row, row]];
    }

    if out.iter().all(|v| v.is_finite()) {
        Some(out)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn overlapping_data() -> (Array2<f64>, Vec<u8>) {
        let x = array![
            [-2.0, 0.5],
            [-1.5, -0.3],
            [-1.0, 0.8],
            [-0.5, -1.0],
            [0.0, 0.1],
            [0.3, -0.4],
            [0.5, 1.2],
            [1.0, -0.6],
            [1.5, 0.9],
            [2.0, -0.2],
        ];
        let y = vec![0, 0, 0, 1, 0, 1, 0, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-15);
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert_eq!(sigmoid(1000.0), 1.0);
    }

    #[test]
    fn test_softplus_matches_naive() {
        for z in [-5.0, -0.5, 0.0, 0.5, 5.0] {
            let naive = (1.0 + f64::exp(z)).ln();
            assert!((softplus(z) - naive).abs() < 1e-12);
        }
        assert!(softplus(1000.0).is_finite());
    }

    #[test]
    fn test_solve() {
        let a = array![[2.0, 1.0], [1.0, 3.0]];
        let b = array![3.0, 5.0];
        let x = solve(a, b).unwrap();
        assert!((x[0] - 0.8).abs() < 1e-12);
        assert!((x[1] - 1.4).abs() < 1e-12);

        assert!(solve(array![[1.0, 2.0], [2.0, 4.0]], array![1.0, 2.0]).is_none());
    }

    #[test]
    fn test_fit_learns_direction() {
        let (x, y) = overlapping_data();
        let model = LogisticRegression::balanced().fit(x.view(), &y).unwrap();

        assert!(model.coef[0] > 0.0);
        let proba = model.predict_proba(array![[-3.0, 0.0], [3.0, 0.0]].view());
        assert!(proba[0] < 0.5);
        assert!(proba[1] > 0.5);
    }

    #[test]
    fn test_fit_reaches_stationary_point() {
        let (x, y) = overlapping_data();
        let clf = LogisticRegression::default().with_class_weight(ClassWeight::Uniform);
        let model = clf.clone().fit(x.view(), &y).unwrap();

        // Gradient of the penalized objective vanishes at the optimum
        let p = model.predict_proba(x.view());
        for j in 0..2 {
            let data_term: f64 = x
                .column(j)
                .iter()
                .zip(&p)
                .zip(&y)
                .map(|((xi, pi), &yi)| xi * (pi - f64::from(yi)))
                .sum();
            let g = model.coef[j] + clf.c * data_term;
            assert!(g.abs() < 1e-6, "gradient[{}] = {}", j, g);
        }
        let g_b: f64 = p.iter().zip(&y).map(|(pi, &yi)| pi - f64::from(yi)).sum();
        assert!(g_b.abs() < 1e-6);
    }

    #[test]
    fn test_balanced_weights_shift_intercept() {
        // 2 positives, 6 negatives on the same feature range
        let x = array![[-1.0], [-0.5], [0.0], [0.5], [1.0], [1.5], [0.2], [0.8]];
        let y = vec![0, 0, 0, 0, 0, 0, 1, 1];

        let uniform = LogisticRegression::default()
            .with_class_weight(ClassWeight::Uniform)
            .fit(x.view(), &y)
            .unwrap();
        let balanced = LogisticRegression::balanced().fit(x.view(), &y).unwrap();

        assert!(balanced.intercept > uniform.intercept);
    }

    #[test]
    fn test_balanced_sample_weights() {
        let w = ClassWeight::Balanced.sample_weights(&[0, 0, 0, 1]);
        assert!((w[0] - 4.0 / 6.0).abs() < 1e-12);
        assert!((w[3] - 2.0).abs() < 1e-12);
        assert!((w.sum() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_separable_data_stays_finite() {
        let x = array![[-2.0], [-1.0], [1.0], [2.0]];
        let model = LogisticRegression::balanced().fit(x.view(), &[0, 0, 1, 1]).unwrap();
        assert!(model.validate_state().is_ok());
        assert!(model.coef[0] > 0.0);
    }

    #[test]
    fn test_fit_rejects_single_class() {
        let x = array![[1.0], [2.0]];
        let err = LogisticRegression::balanced().fit(x.view(), &[0, 0]).unwrap_err();
        assert_eq!(err, FitError::SingleClass(0));
    }
}
