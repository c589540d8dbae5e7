//! Cross-entropy criteria against hard labels or soft target distributions.

use destilar_common::{DestilarError, Result};
use ndarray::{Array2, Axis};

use super::functional::{log_softmax_2d, softmax_2d};

/// Ground truth for the cross-entropy term.
#[derive(Debug, Clone, PartialEq)]
pub enum Targets {
    /// One class index per sample
    Hard(Vec<usize>),
    /// One distribution per sample, `[batch, classes]`
    Soft(Array2<f32>),
}

impl Targets {
    /// Number of samples described.
    pub fn len(&self) -> usize {
        match self {
            Self::Hard(labels) => labels.len(),
            Self::Soft(dist) => dist.nrows(),
        }
    }

    /// Whether no samples are described.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dense `[batch, classes]` targets.
    ///
    /// Hard labels are smoothed with `smoothing`; soft targets are returned
    /// as-is after a shape check.
    pub fn to_soft(&self, num_classes: usize, smoothing: f32) -> Result<Array2<f32>> {
        match self {
            Self::Hard(labels) => smoothed_one_hot(labels, num_classes, smoothing),
            Self::Soft(dist) => {
                if dist.ncols() != num_classes {
                    return Err(DestilarError::shape(
                        "targets",
                        &[dist.nrows(), num_classes],
                        dist.shape(),
                    ));
                }
                Ok(dist.clone())
            }
        }
    }
}

impl From<Vec<usize>> for Targets {
    fn from(labels: Vec<usize>) -> Self {
        Self::Hard(labels)
    }
}

impl From<Array2<f32>> for Targets {
    fn from(dist: Array2<f32>) -> Self {
        Self::Soft(dist)
    }
}

/// One-hot encode class indices.
pub fn one_hot(labels: &[usize], num_classes: usize) -> Result<Array2<f32>> {
    smoothed_one_hot(labels, num_classes, 0.0)
}

/// One-hot encode with label smoothing.
///
/// Each row is `ε / C` everywhere and `1 - ε + ε / C` at the label.
pub fn smoothed_one_hot(labels: &[usize], num_classes: usize, smoothing: f32) -> Result<Array2<f32>> {
    let off = smoothing / num_classes as f32;
    let on = 1.0 - smoothing + off;

    let mut out = Array2::from_elem((labels.len(), num_classes), off);
    for (row, &label) in labels.iter().enumerate() {
        if label >= num_classes {
            return Err(DestilarError::LabelOutOfRange {
                row,
                label,
                num_classes,
            });
        }
        out[[row, label]] = on;
    }

    Ok(out)
}

/// Mixup soft targets.
///
/// Blends each smoothed one-hot row with the row of the batch reversed:
/// `λ * y + (1 - λ) * flip(y)`. This is the target layout mixup/cutmix
/// augmentation feeds to [`SoftTargetCrossEntropy`].
pub fn mixup_targets(
    labels: &[usize],
    num_classes: usize,
    lambda: f32,
    smoothing: f32,
) -> Result<Array2<f32>> {
    let y = smoothed_one_hot(labels, num_classes, smoothing)?;
    let flipped = y.slice(ndarray::s![..;-1, ..]).to_owned();
    Ok(&y * lambda + &flipped * (1.0 - lambda))
}

/// Cross-entropy against per-sample target distributions.
///
/// ```text
/// L = mean_b Σ_i -y_bi * log_softmax(x_b)_i
/// ```
///
/// # Example
///
/// ```
/// use destilar::distill::SoftTargetCrossEntropy;
/// use ndarray::array;
///
/// let logits = array![[2.0, 1.0, 0.1]];
/// let targets = array![[1.0, 0.0, 0.0]];
/// let loss = SoftTargetCrossEntropy.forward(&logits, &targets).unwrap();
/// assert!(loss > 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftTargetCrossEntropy;

impl SoftTargetCrossEntropy {
    /// Mean cross-entropy over the batch.
    pub fn forward(&self, logits: &Array2<f32>, targets: &Array2<f32>) -> Result<f32> {
        check_logits(logits, targets)?;

        let log_probs = log_softmax_2d(logits);
        let total: f32 = -(&log_probs * targets).sum();
        Ok(total / logits.nrows() as f32)
    }

    /// Gradient with respect to the logits.
    ///
    /// dL/dx_b = (softmax(x_b) * Σ_i y_bi - y_b) / B
    pub fn backward(&self, logits: &Array2<f32>, targets: &Array2<f32>) -> Result<Array2<f32>> {
        check_logits(logits, targets)?;

        let batch = logits.nrows() as f32;
        let mass = targets.sum_axis(Axis(1)).insert_axis(Axis(1));
        let probs = softmax_2d(logits);
        Ok((&probs * &mass - targets) / batch)
    }
}

/// Cross-entropy with hard labels and label smoothing.
///
/// ```text
/// L = mean_b [ (1 - ε) * -log p_b[y_b] + ε * mean_i(-log p_b[i]) ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelSmoothingCrossEntropy {
    /// Smoothing factor ε in [0, 1)
    pub smoothing: f32,
}

impl Default for LabelSmoothingCrossEntropy {
    fn default() -> Self {
        Self { smoothing: 0.1 }
    }
}

impl LabelSmoothingCrossEntropy {
    /// Create the criterion.
    ///
    /// # Errors
    ///
    /// Returns a config error when `smoothing` is outside [0, 1).
    pub fn new(smoothing: f32) -> Result<Self> {
        if !(0.0..1.0).contains(&smoothing) {
            return Err(DestilarError::ConfigValue {
                field: "label_smoothing".into(),
                message: format!("Smoothing must be in [0, 1), got {smoothing}"),
                suggestion: "Use 0.0 to disable or 0.1 for typical smoothing".into(),
            });
        }
        Ok(Self { smoothing })
    }

    /// Mean smoothed cross-entropy over the batch.
    pub fn forward(&self, logits: &Array2<f32>, labels: &[usize]) -> Result<f32> {
        let targets = self.targets(logits, labels)?;
        SoftTargetCrossEntropy.forward(logits, &targets)
    }

    /// Gradient with respect to the logits.
    pub fn backward(&self, logits: &Array2<f32>, labels: &[usize]) -> Result<Array2<f32>> {
        let targets = self.targets(logits, labels)?;
        SoftTargetCrossEntropy.backward(logits, &targets)
    }

    fn targets(&self, logits: &Array2<f32>, labels: &[usize]) -> Result<Array2<f32>> {
        if logits.nrows() != labels.len() {
            return Err(DestilarError::shape(
                "labels",
                &[logits.nrows()],
                &[labels.len()],
            ));
        }
        smoothed_one_hot(labels, logits.ncols(), self.smoothing)
    }
}

fn check_logits(logits: &Array2<f32>, targets: &Array2<f32>) -> Result<()> {
    if logits.is_empty() {
        return Err(DestilarError::EmptyBatch {
            input: "logits".into(),
            shape: logits.shape().to_vec(),
        });
    }
    if logits.shape() != targets.shape() {
        return Err(DestilarError::shape("targets", logits.shape(), targets.shape()));
    }
    Ok(())
}
