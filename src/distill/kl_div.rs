//! Kullback-Leibler divergence criterion.

use destilar_common::{DestilarError, Result};
use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

/// How pointwise KL terms are reduced to a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    /// Sum over all elements divided by the batch size
    #[default]
    BatchMean,
    /// Sum over all elements
    Sum,
    /// Mean over all elements
    Mean,
}

impl Reduction {
    /// Divisor applied to the summed pointwise terms for a `[rows, cols]` input.
    pub fn divisor(self, rows: usize, cols: usize) -> f32 {
        match self {
            Self::BatchMean => rows as f32,
            Self::Sum => 1.0,
            Self::Mean => (rows * cols) as f32,
        }
    }
}

/// KL divergence between a target distribution and the input.
///
/// The input holds log-probabilities (e.g. the student's log-softmax). The
/// target holds log-probabilities when `log_target` is set, otherwise plain
/// probabilities:
///
/// ```text
/// log_target = true:   l = exp(t) * (t - s)
/// log_target = false:  l = t * (ln t - s),   0 where t = 0
/// ```
///
/// # Example
///
/// ```
/// use destilar::distill::{functional::log_softmax_2d, KlDivLoss};
/// use ndarray::array;
///
/// let kl = KlDivLoss::default();
/// let student = log_softmax_2d(&array![[2.0, 1.0, 0.5]]);
/// let teacher = log_softmax_2d(&array![[1.5, 1.2, 0.8]]);
///
/// let loss = kl.forward(&student, &teacher).unwrap();
/// assert!(loss > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KlDivLoss {
    /// Reduction to a scalar
    pub reduction: Reduction,
    /// Whether the target is given as log-probabilities
    pub log_target: bool,
}

impl Default for KlDivLoss {
    fn default() -> Self {
        Self {
            reduction: Reduction::BatchMean,
            log_target: true,
        }
    }
}

impl KlDivLoss {
    /// Create a KL criterion.
    pub fn new(reduction: Reduction, log_target: bool) -> Self {
        Self {
            reduction,
            log_target,
        }
    }

    /// Unreduced pointwise terms, same shape as the input.
    pub fn pointwise(&self, input: &Array2<f32>, target: &Array2<f32>) -> Result<Array2<f32>> {
        check_pair(input, target)?;

        let mut out = Array2::zeros(input.raw_dim());
        if self.log_target {
            Zip::from(&mut out)
                .and(input)
                .and(target)
                .for_each(|o, &s, &t| *o = t.exp() * (t - s));
        } else {
            Zip::from(&mut out)
                .and(input)
                .and(target)
                .for_each(|o, &s, &t| {
                    *o = if t > 0.0 { t * (t.ln() - s) } else { 0.0 };
                });
        }

        Ok(out)
    }

    /// Reduced divergence.
    pub fn forward(&self, input: &Array2<f32>, target: &Array2<f32>) -> Result<f32> {
        let terms = self.pointwise(input, target)?;
        Ok(terms.sum() / self.reduction.divisor(input.nrows(), input.ncols()))
    }

    /// Gradient of [`forward`](Self::forward) with respect to the input
    /// log-probabilities.
    ///
    /// d l / d s = -p, where p is the target distribution.
    pub fn backward(&self, input: &Array2<f32>, target: &Array2<f32>) -> Result<Array2<f32>> {
        check_pair(input, target)?;

        let scale = -1.0 / self.reduction.divisor(input.nrows(), input.ncols());
        let grad = if self.log_target {
            target.mapv(|t| t.exp() * scale)
        } else {
            target.mapv(|t| if t > 0.0 { t * scale } else { 0.0 })
        };

        Ok(grad)
    }
}

fn check_pair(input: &Array2<f32>, target: &Array2<f32>) -> Result<()> {
    if input.is_empty() {
        return Err(DestilarError::EmptyBatch {
            input: "kl input".into(),
            shape: input.shape().to_vec(),
        });
    }
    if input.shape() != target.shape() {
        return Err(DestilarError::shape("kl target", input.shape(), target.shape()));
    }
    Ok(())
}
