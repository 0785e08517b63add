//! Margin-based kernel classifier (RBF support vector machine).
//!
//! Trained with a sequential-minimal-optimization loop over pairs of
//! Lagrange multipliers. Class imbalance is countered by scaling each
//! sample's box constraint by its balanced class weight. Raw margins are
//! mapped to class probabilities with Platt scaling (a sigmoid fitted on
//! the training decision values), so the ensemble layer can average this
//! model's output with the forest's.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::classifier::types::{CLASS_COUNT, Label};
use crate::error::{Result, TriageError};

/// SVM hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvmConfig {
    /// Soft-margin penalty. Per-sample bounds are `c * sample_weight`.
    pub c: f64,
    /// RBF kernel width; `None` selects 1 / (n_features * mean variance),
    /// recomputed per training run from the data.
    pub gamma: Option<f64>,
    /// KKT violation tolerance.
    pub tolerance: f64,
    /// Optimization stops after this many consecutive sweeps without an
    /// alpha update.
    pub max_stalled_sweeps: usize,
    /// Hard cap on optimization sweeps.
    pub max_sweeps: usize,
    /// Seed for the partner-multiplier choice.
    pub seed: u64,
}

impl Default for SvmConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            gamma: None,
            tolerance: 1e-3,
            max_stalled_sweeps: 5,
            max_sweeps: 200,
            seed: 42,
        }
    }
}

/// Trained RBF-kernel SVM with Platt-calibrated probabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelSvm {
    gamma: f64,
    /// Support vectors (rows with non-zero multipliers).
    support_vectors: Vec<Vec<f64>>,
    /// `alpha_i * y_i` per support vector.
    coefficients: Vec<f64>,
    bias: f64,
    /// Platt sigmoid slope.
    platt_a: f64,
    /// Platt sigmoid intercept.
    platt_b: f64,
    n_features: usize,
}

fn rbf(gamma: f64, a: &[f64], b: &[f64]) -> f64 {
    let squared_distance: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum();
    (-gamma * squared_distance).exp()
}

/// sklearn's "scale" heuristic: 1 / (n_features * mean per-feature variance).
fn scale_gamma(rows: &[Vec<f64>]) -> f64 {
    let n = rows.len() as f64;
    let d = rows[0].len();

    let mut variance_sum = 0.0;
    for feature in 0..d {
        let mean: f64 = rows.iter().map(|r| r[feature]).sum::<f64>() / n;
        variance_sum += rows.iter().map(|r| (r[feature] - mean).powi(2)).sum::<f64>() / n;
    }

    let mean_variance = variance_sum / d as f64;
    if mean_variance > 0.0 {
        1.0 / (d as f64 * mean_variance)
    } else {
        1.0
    }
}

impl KernelSvm {
    /// Fit the SVM on dense feature rows with per-sample (class-balanced)
    /// weights.
    pub fn fit(
        config: SvmConfig,
        rows: &[Vec<f64>],
        labels: &[Label],
        sample_weights: &[f64],
    ) -> Result<Self> {
        if rows.is_empty() {
            return Err(TriageError::training("cannot fit SVM on empty data"));
        }
        if rows.len() != labels.len() || rows.len() != sample_weights.len() {
            return Err(TriageError::training(
                "rows, labels and weights must have equal lengths",
            ));
        }

        let n = rows.len();
        let n_features = rows[0].len();
        let gamma = config.gamma.unwrap_or_else(|| scale_gamma(rows));

        // y in {-1, +1}; verified is the positive class.
        let y: Vec<f64> = labels
            .iter()
            .map(|l| match l {
                Label::Verified => 1.0,
                Label::NotVerified => -1.0,
            })
            .collect();
        let box_bounds: Vec<f64> = sample_weights.iter().map(|w| config.c * w).collect();

        // Full kernel matrix; training corpora here are small enough that
        // O(n^2) storage beats recomputing kernels inside the sweep.
        let mut kernel = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in i..n {
                let k = rbf(gamma, &rows[i], &rows[j]);
                kernel[i][j] = k;
                kernel[j][i] = k;
            }
        }

        let mut alpha = vec![0.0; n];
        let mut bias = 0.0;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let decision = |alpha: &[f64], bias: f64, k: usize, kernel: &[Vec<f64>]| -> f64 {
            let mut sum = bias;
            for i in 0..n {
                if alpha[i] > 0.0 {
                    sum += alpha[i] * y[i] * kernel[i][k];
                }
            }
            sum
        };

        let mut stalled = 0;
        let mut sweeps = 0;
        while n > 1 && stalled < config.max_stalled_sweeps && sweeps < config.max_sweeps {
            let mut updated = 0;
            for i in 0..n {
                let error_i = decision(&alpha, bias, i, &kernel) - y[i];
                let violates = (y[i] * error_i < -config.tolerance && alpha[i] < box_bounds[i])
                    || (y[i] * error_i > config.tolerance && alpha[i] > 0.0);
                if !violates {
                    continue;
                }

                let mut j = rng.random_range(0..n - 1);
                if j >= i {
                    j += 1;
                }
                let error_j = decision(&alpha, bias, j, &kernel) - y[j];

                let (alpha_i_old, alpha_j_old) = (alpha[i], alpha[j]);
                let (low, high) = if y[i] != y[j] {
                    (
                        (alpha_j_old - alpha_i_old).max(0.0),
                        (box_bounds[i] + alpha_j_old - alpha_i_old).min(box_bounds[j]),
                    )
                } else {
                    (
                        (alpha_i_old + alpha_j_old - box_bounds[i]).max(0.0),
                        (alpha_i_old + alpha_j_old).min(box_bounds[j]),
                    )
                };
                if low >= high {
                    continue;
                }

                let eta = 2.0 * kernel[i][j] - kernel[i][i] - kernel[j][j];
                if eta >= 0.0 {
                    continue;
                }

                let mut alpha_j_new = alpha_j_old - y[j] * (error_i - error_j) / eta;
                alpha_j_new = alpha_j_new.clamp(low, high);
                if (alpha_j_new - alpha_j_old).abs() < 1e-5 {
                    continue;
                }
                let alpha_i_new = alpha_i_old + y[i] * y[j] * (alpha_j_old - alpha_j_new);

                alpha[i] = alpha_i_new;
                alpha[j] = alpha_j_new;

                let b1 = bias
                    - error_i
                    - y[i] * (alpha_i_new - alpha_i_old) * kernel[i][i]
                    - y[j] * (alpha_j_new - alpha_j_old) * kernel[i][j];
                let b2 = bias
                    - error_j
                    - y[i] * (alpha_i_new - alpha_i_old) * kernel[i][j]
                    - y[j] * (alpha_j_new - alpha_j_old) * kernel[j][j];

                bias = if alpha_i_new > 0.0 && alpha_i_new < box_bounds[i] {
                    b1
                } else if alpha_j_new > 0.0 && alpha_j_new < box_bounds[j] {
                    b2
                } else {
                    (b1 + b2) / 2.0
                };

                updated += 1;
            }

            sweeps += 1;
            if updated == 0 {
                stalled += 1;
            } else {
                stalled = 0;
            }
        }

        // Training decision values, for Platt calibration.
        let margins: Vec<f64> = (0..n).map(|k| decision(&alpha, bias, k, &kernel)).collect();
        let (platt_a, platt_b) = fit_platt_sigmoid(&margins, &y);

        let mut support_vectors = Vec::new();
        let mut coefficients = Vec::new();
        for i in 0..n {
            if alpha[i] > 1e-8 {
                support_vectors.push(rows[i].clone());
                coefficients.push(alpha[i] * y[i]);
            }
        }

        Ok(Self {
            gamma,
            support_vectors,
            coefficients,
            bias,
            platt_a,
            platt_b,
            n_features,
        })
    }

    /// Raw (uncalibrated) decision value; positive favors `Verified`.
    pub fn decision_value(&self, sample: &[f64]) -> Result<f64> {
        if sample.len() != self.n_features {
            return Err(TriageError::ArtifactMismatch {
                expected: self.n_features,
                found: sample.len(),
            });
        }

        let mut sum = self.bias;
        for (sv, coefficient) in self.support_vectors.iter().zip(&self.coefficients) {
            sum += coefficient * rbf(self.gamma, sv, sample);
        }
        Ok(sum)
    }

    /// Calibrated class distribution `[not_verified, verified]`.
    pub fn predict_proba(&self, sample: &[f64]) -> Result<[f64; CLASS_COUNT]> {
        let margin = self.decision_value(sample)?;
        let p_verified = 1.0 / (1.0 + (self.platt_a * margin + self.platt_b).exp());
        Ok([1.0 - p_verified, p_verified])
    }

    /// Top-1 label.
    pub fn predict(&self, sample: &[f64]) -> Result<Label> {
        Ok(Label::argmax(&self.predict_proba(sample)?).0)
    }

    /// Feature width the SVM was trained against.
    pub fn feature_width(&self) -> usize {
        self.n_features
    }

    /// Number of retained support vectors.
    pub fn support_vector_count(&self) -> usize {
        self.support_vectors.len()
    }
}

/// Fit Platt's sigmoid `p = 1 / (1 + exp(a * margin + b))` by gradient
/// descent on the cross-entropy against regularized targets.
fn fit_platt_sigmoid(margins: &[f64], y: &[f64]) -> (f64, f64) {
    let n_positive = y.iter().filter(|v| **v > 0.0).count() as f64;
    let n_negative = y.len() as f64 - n_positive;

    // Platt's target regularization keeps the sigmoid off the 0/1 rails.
    let target_positive = (n_positive + 1.0) / (n_positive + 2.0);
    let target_negative = 1.0 / (n_negative + 2.0);
    let targets: Vec<f64> = y
        .iter()
        .map(|v| if *v > 0.0 { target_positive } else { target_negative })
        .collect();

    let mut a = -1.0;
    let mut b = 0.0;
    let learning_rate = 0.1;
    let n = margins.len() as f64;

    for _ in 0..1000 {
        let mut grad_a = 0.0;
        let mut grad_b = 0.0;
        for (margin, target) in margins.iter().zip(&targets) {
            let p = 1.0 / (1.0 + (a * margin + b).exp());
            grad_a += (target - p) * margin;
            grad_b += target - p;
        }
        a -= learning_rate * grad_a / n;
        b -= learning_rate * grad_b / n;
    }

    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_data() -> (Vec<Vec<f64>>, Vec<Label>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..20 {
            let jitter = (i as f64) * 0.02;
            rows.push(vec![1.0 + jitter, 0.0]);
            labels.push(Label::Verified);
            rows.push(vec![-1.0 - jitter, 0.0]);
            labels.push(Label::NotVerified);
        }
        (rows, labels)
    }

    #[test]
    fn test_svm_learns_separable_data() {
        let (rows, labels) = toy_data();
        let weights = vec![1.0; rows.len()];
        let svm = KernelSvm::fit(SvmConfig::default(), &rows, &labels, &weights).unwrap();

        assert_eq!(svm.predict(&[1.2, 0.0]).unwrap(), Label::Verified);
        assert_eq!(svm.predict(&[-1.2, 0.0]).unwrap(), Label::NotVerified);
        assert!(svm.support_vector_count() > 0);
    }

    #[test]
    fn test_svm_probabilities_are_calibrated_distribution() {
        let (rows, labels) = toy_data();
        let weights = vec![1.0; rows.len()];
        let svm = KernelSvm::fit(SvmConfig::default(), &rows, &labels, &weights).unwrap();

        let probabilities = svm.predict_proba(&[1.0, 0.0]).unwrap();
        let sum: f64 = probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(probabilities[Label::Verified.index()] > 0.5);
    }

    #[test]
    fn test_svm_rejects_wrong_width() {
        let (rows, labels) = toy_data();
        let weights = vec![1.0; rows.len()];
        let svm = KernelSvm::fit(SvmConfig::default(), &rows, &labels, &weights).unwrap();

        assert!(matches!(
            svm.predict_proba(&[0.0]),
            Err(TriageError::ArtifactMismatch { .. })
        ));
    }

    #[test]
    fn test_platt_sigmoid_orientation() {
        // Larger margins must map to larger positive-class probability.
        let margins = vec![-2.0, -1.5, -1.0, 1.0, 1.5, 2.0];
        let y = vec![-1.0, -1.0, -1.0, 1.0, 1.0, 1.0];
        let (a, b) = fit_platt_sigmoid(&margins, &y);

        let p = |m: f64| 1.0 / (1.0 + (a * m + b).exp());
        assert!(p(2.0) > p(-2.0));
        assert!(p(2.0) > 0.5);
        assert!(p(-2.0) < 0.5);
    }
}
