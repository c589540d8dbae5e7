//! Distillation loss functions

use destilar_common::{DestilarError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use super::cross_entropy::{SoftTargetCrossEntropy, Targets};
use super::functional::{log_softmax_2d, log_softmax_backward, soften};
use super::kl_div::KlDivLoss;

/// Which distillation objective to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistillMode {
    /// Cross-entropy plus one clean-input KL term
    Vanilla,
    /// Cross-entropy plus clean-input and augmented-input KL terms
    #[default]
    Augmented,
}

impl fmt::Display for DistillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vanilla => write!(f, "vanilla"),
            Self::Augmented => write!(f, "augmented"),
        }
    }
}

/// Logits and targets for one loss evaluation.
///
/// All logit matrices are `[batch, classes]`. The augmented pair is only
/// read in [`DistillMode::Augmented`].
#[derive(Debug, Clone)]
pub struct DistillInputs {
    /// Student logits on clean inputs
    pub student: Array2<f32>,
    /// Teacher logits on clean inputs
    pub teacher: Array2<f32>,
    /// Student logits on augmented inputs
    pub student_aug: Option<Array2<f32>>,
    /// Teacher logits on augmented inputs
    pub teacher_aug: Option<Array2<f32>>,
    /// Ground truth for the clean inputs
    pub targets: Targets,
}

/// Weighted terms that make up a loss value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LossBreakdown {
    /// Weighted cross-entropy term
    pub cross_entropy: f32,
    /// Weighted, T²-scaled KL term on clean inputs
    pub kl: f32,
    /// Weighted, T²-scaled KL term on augmented inputs
    pub kl_aug: Option<f32>,
}

impl LossBreakdown {
    /// Sum of all terms.
    pub fn total(&self) -> f32 {
        self.cross_entropy + self.kl + self.kl_aug.unwrap_or(0.0)
    }
}

/// Loss value together with gradients for the student.
#[derive(Debug, Clone)]
pub struct LossOutput {
    /// Scalar loss
    pub loss: f32,
    /// Per-term contributions
    pub breakdown: LossBreakdown,
    /// dL/d(student logits)
    pub grad_student: Array2<f32>,
    /// dL/d(augmented student logits), augmented mode only
    pub grad_student_aug: Option<Array2<f32>>,
}

/// Knowledge Distillation Loss
///
/// Combines temperature-softened teacher/student agreement (KL divergence on
/// log-softmax outputs) with cross-entropy against the ground truth. With
/// temperature `T` and distil weight `w`:
///
/// ```text
/// vanilla:    L = (1 - w) * CE(s, y) + w * T² * KL(s/T, t/T)
/// augmented:  L = CE(s, y) + w * T² * KL(s/T, t/T) + w * T² * KL(s'/T, t'/T)
/// ```
///
/// where `s'`, `t'` are the student and teacher logits on augmented inputs.
/// The cross-entropy always uses the clean student logits. At the default
/// `w = 0.5` the vanilla form weighs both terms by one half.
///
/// # Example
///
/// ```
/// use destilar::distill::{DistillationLoss, Targets};
/// use ndarray::array;
///
/// let loss_fn = DistillationLoss::new(4.0, 0.5).unwrap();
/// let student = array![[2.0, 1.0, 0.5]];
/// let teacher = array![[1.5, 1.2, 0.8]];
/// let labels = Targets::Hard(vec![0]);
///
/// let loss = loss_fn.vanilla(&student, &teacher, &labels).unwrap();
/// assert!(loss > 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistillationLoss {
    /// Temperature for softening probability distributions
    pub temperature: f32,
    /// Weight on each KL term
    pub distil_weight: f32,
    /// Label smoothing applied to hard targets
    pub label_smoothing: f32,
    /// KL criterion applied to the softened outputs
    pub kl: KlDivLoss,
}

impl Default for DistillationLoss {
    fn default() -> Self {
        Self {
            temperature: 4.0,
            distil_weight: 0.5,
            label_smoothing: 0.0,
            kl: KlDivLoss::default(),
        }
    }
}

impl DistillationLoss {
    /// Create a distillation loss.
    ///
    /// # Errors
    ///
    /// Returns a config error if `temperature` is not a positive finite
    /// number or `distil_weight` is outside [0, 1].
    pub fn new(temperature: f32, distil_weight: f32) -> Result<Self> {
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(DestilarError::ConfigValue {
                field: "temperature".into(),
                message: format!("Temperature must be positive, got {temperature}"),
                suggestion: "Use temperature 1.0-8.0 (4.0 recommended)".into(),
            });
        }
        if !(0.0..=1.0).contains(&distil_weight) {
            return Err(DestilarError::ConfigValue {
                field: "distil_weight".into(),
                message: format!("Distil weight must be in [0, 1], got {distil_weight}"),
                suggestion: "Use 0.5 to weigh soft and hard terms equally".into(),
            });
        }

        Ok(Self {
            temperature,
            distil_weight,
            ..Self::default()
        })
    }

    /// Replace the KL criterion.
    #[must_use]
    pub fn with_kl(mut self, kl: KlDivLoss) -> Self {
        self.kl = kl;
        self
    }

    /// Smooth hard labels before the cross-entropy term.
    pub fn with_label_smoothing(mut self, smoothing: f32) -> Result<Self> {
        if !(0.0..1.0).contains(&smoothing) {
            return Err(DestilarError::ConfigValue {
                field: "label_smoothing".into(),
                message: format!("Smoothing must be in [0, 1), got {smoothing}"),
                suggestion: "Use 0.0 to disable or 0.1 for typical smoothing".into(),
            });
        }
        self.label_smoothing = smoothing;
        Ok(self)
    }

    /// Vanilla teacher-student loss.
    pub fn vanilla(
        &self,
        student: &Array2<f32>,
        teacher: &Array2<f32>,
        targets: &Targets,
    ) -> Result<f32> {
        self.vanilla_with_grad(student, teacher, targets)
            .map(|out| out.loss)
    }

    /// Loss that also aligns teacher and student under augmentation.
    pub fn augmented(
        &self,
        student: &Array2<f32>,
        teacher: &Array2<f32>,
        teacher_aug: &Array2<f32>,
        student_aug: &Array2<f32>,
        targets: &Targets,
    ) -> Result<f32> {
        self.augmented_with_grad(student, teacher, teacher_aug, student_aug, targets)
            .map(|out| out.loss)
    }

    /// Vanilla loss with its breakdown and student gradient.
    pub fn vanilla_with_grad(
        &self,
        student: &Array2<f32>,
        teacher: &Array2<f32>,
        targets: &Targets,
    ) -> Result<LossOutput> {
        check_pair(("student", "teacher"), student, teacher)?;

        let hard_weight = 1.0 - self.distil_weight;
        let (ce, ce_grad) = self.cross_entropy_term(student, targets, hard_weight)?;
        let (kl, kl_grad) = self.kl_term(student, teacher)?;

        let breakdown = LossBreakdown {
            cross_entropy: ce,
            kl,
            kl_aug: None,
        };
        Ok(self.finish(DistillMode::Vanilla, breakdown, ce_grad + kl_grad, None))
    }

    /// Augmented loss with its breakdown and both student gradients.
    ///
    /// The augmented pair must match each other and the class count of the
    /// clean logits. Its batch size may differ from the clean batch.
    pub fn augmented_with_grad(
        &self,
        student: &Array2<f32>,
        teacher: &Array2<f32>,
        teacher_aug: &Array2<f32>,
        student_aug: &Array2<f32>,
        targets: &Targets,
    ) -> Result<LossOutput> {
        check_pair(("student", "teacher"), student, teacher)?;
        check_pair(("student_aug", "teacher_aug"), student_aug, teacher_aug)?;
        if student_aug.ncols() != student.ncols() {
            return Err(DestilarError::shape(
                "student_aug",
                &[student_aug.nrows(), student.ncols()],
                student_aug.shape(),
            ));
        }

        let (ce, ce_grad) = self.cross_entropy_term(student, targets, 1.0)?;
        let (kl, kl_grad) = self.kl_term(student, teacher)?;
        let (kl_aug, kl_aug_grad) = self.kl_term(student_aug, teacher_aug)?;

        let breakdown = LossBreakdown {
            cross_entropy: ce,
            kl,
            kl_aug: Some(kl_aug),
        };
        Ok(self.finish(
            DistillMode::Augmented,
            breakdown,
            ce_grad + kl_grad,
            Some(kl_aug_grad),
        ))
    }

    /// Evaluate the objective selected by `mode`.
    pub fn compute(&self, mode: DistillMode, inputs: &DistillInputs) -> Result<LossOutput> {
        match mode {
            DistillMode::Vanilla => {
                self.vanilla_with_grad(&inputs.student, &inputs.teacher, &inputs.targets)
            }
            DistillMode::Augmented => {
                let student_aug = inputs
                    .student_aug
                    .as_ref()
                    .ok_or_else(|| missing("student_aug", mode))?;
                let teacher_aug = inputs
                    .teacher_aug
                    .as_ref()
                    .ok_or_else(|| missing("teacher_aug", mode))?;
                self.augmented_with_grad(
                    &inputs.student,
                    &inputs.teacher,
                    teacher_aug,
                    student_aug,
                    &inputs.targets,
                )
            }
        }
    }

    /// Weighted soft-target cross-entropy and its gradient.
    fn cross_entropy_term(
        &self,
        student: &Array2<f32>,
        targets: &Targets,
        weight: f32,
    ) -> Result<(f32, Array2<f32>)> {
        if targets.len() != student.nrows() {
            return Err(DestilarError::shape(
                "targets",
                &[student.nrows()],
                &[targets.len()],
            ));
        }

        let soft = targets.to_soft(student.ncols(), self.label_smoothing)?;
        let ce = SoftTargetCrossEntropy.forward(student, &soft)?;
        let grad = SoftTargetCrossEntropy.backward(student, &soft)? * weight;
        Ok((weight * ce, grad))
    }

    /// `w * T² * KL` between softened outputs, and its gradient with respect
    /// to the student logits. The teacher side is treated as constant.
    fn kl_term(&self, student: &Array2<f32>, teacher: &Array2<f32>) -> Result<(f32, Array2<f32>)> {
        let t = self.temperature;
        let scale = self.distil_weight * t * t;

        let student_log = log_softmax_2d(&soften(student, t));
        let mut teacher_soft = log_softmax_2d(&soften(teacher, t));
        if !self.kl.log_target {
            teacher_soft.mapv_inplace(f32::exp);
        }

        let kl = self.kl.forward(&student_log, &teacher_soft)?;
        let grad_log = self.kl.backward(&student_log, &teacher_soft)? * scale;
        let grad = log_softmax_backward(&grad_log, &student_log) / t;

        Ok((scale * kl, grad))
    }

    fn finish(
        &self,
        mode: DistillMode,
        breakdown: LossBreakdown,
        grad_student: Array2<f32>,
        grad_student_aug: Option<Array2<f32>>,
    ) -> LossOutput {
        let loss = breakdown.total();
        if loss.is_finite() {
            debug!(
                %mode,
                loss,
                cross_entropy = breakdown.cross_entropy,
                kl = breakdown.kl,
                kl_aug = ?breakdown.kl_aug,
                temperature = self.temperature,
                "distillation loss"
            );
        } else {
            warn!(%mode, ?breakdown, "distillation loss is not finite");
        }

        LossOutput {
            loss,
            breakdown,
            grad_student,
            grad_student_aug,
        }
    }
}

fn missing(input: &str, mode: DistillMode) -> DestilarError {
    DestilarError::MissingInput {
        input: input.into(),
        mode: mode.to_string(),
    }
}

fn check_pair(
    (student_name, other_name): (&str, &str),
    student: &Array2<f32>,
    other: &Array2<f32>,
) -> Result<()> {
    if student.is_empty() {
        return Err(DestilarError::EmptyBatch {
            input: student_name.into(),
            shape: student.shape().to_vec(),
        });
    }
    if student.shape() != other.shape() {
        return Err(DestilarError::shape(other_name, student.shape(), other.shape()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distill::cross_entropy::one_hot;
    use crate::distill::kl_div::Reduction;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn fixture() -> (Array2<f32>, Array2<f32>, Array2<f32>, Array2<f32>) {
        let student = array![[2.0, 1.0, 0.5], [0.1, 0.3, 2.2]];
        let teacher = array![[1.5, 1.2, 0.8], [-0.5, 0.4, 1.9]];
        let student_aug = array![[1.7, 1.1, 0.2], [0.0, 0.9, 1.5]];
        let teacher_aug = array![[1.2, 1.4, 0.3], [0.2, 0.1, 2.4]];
        (student, teacher, student_aug, teacher_aug)
    }

    #[test]
    fn test_vanilla_known_value() {
        let loss_fn = DistillationLoss::default();
        let student = array![[2.0, 1.0, 0.5]];
        let teacher = array![[1.5, 1.2, 0.8]];

        let out = loss_fn
            .vanilla_with_grad(&student, &teacher, &Targets::Hard(vec![0]))
            .unwrap();

        // 0.5 * CE + 0.5 * 16 * KL with CE = 0.464369, KL = 0.004141
        assert_relative_eq!(out.breakdown.cross_entropy, 0.232_184, epsilon = 1e-5);
        assert_relative_eq!(out.breakdown.kl, 0.033_128, epsilon = 1e-5);
        assert_relative_eq!(out.loss, 0.265_312, epsilon = 1e-5);
        assert!(out.grad_student_aug.is_none());
    }

    #[test]
    fn test_augmented_known_value() {
        let (student, teacher, student_aug, teacher_aug) = fixture();
        let loss_fn = DistillationLoss::default();

        let out = loss_fn
            .augmented_with_grad(
                &student,
                &teacher,
                &teacher_aug,
                &student_aug,
                &Targets::Hard(vec![0, 2]),
            )
            .unwrap();

        assert_relative_eq!(out.breakdown.cross_entropy, 0.352_489, epsilon = 1e-5);
        assert_relative_eq!(out.breakdown.kl, 0.025_136, epsilon = 1e-5);
        assert_relative_eq!(out.breakdown.kl_aug.unwrap(), 0.078_310, epsilon = 1e-5);
        assert_relative_eq!(out.loss, 0.455_935, epsilon = 1e-5);
    }

    #[test]
    fn test_identical_logits_leave_only_cross_entropy() {
        let logits = array![[3.0, -1.0, 0.5, 0.0]];
        let targets = Targets::Hard(vec![2]);
        let out = DistillationLoss::default()
            .vanilla_with_grad(&logits, &logits, &targets)
            .unwrap();

        assert_relative_eq!(out.breakdown.kl, 0.0, epsilon = 1e-6);
        let ce = SoftTargetCrossEntropy
            .forward(&logits, &one_hot(&[2], 4).unwrap())
            .unwrap();
        assert_relative_eq!(out.loss, 0.5 * ce, epsilon = 1e-6);
    }

    #[test]
    fn test_augmented_with_identical_pairs_equals_full_cross_entropy() {
        let (student, _, student_aug, _) = fixture();
        let targets = Targets::Hard(vec![1, 0]);
        let loss = DistillationLoss::default()
            .augmented(&student, &student, &student_aug, &student_aug, &targets)
            .unwrap();

        let ce = SoftTargetCrossEntropy
            .forward(&student, &one_hot(&[1, 0], 3).unwrap())
            .unwrap();
        assert_relative_eq!(loss, ce, epsilon = 1e-5);
    }

    #[test]
    fn test_zero_weight_is_pure_cross_entropy() {
        let (student, teacher, _, _) = fixture();
        let targets = Targets::Hard(vec![0, 1]);
        let out = DistillationLoss::new(4.0, 0.0)
            .unwrap()
            .vanilla_with_grad(&student, &teacher, &targets)
            .unwrap();

        assert_eq!(out.breakdown.kl, 0.0);
        let ce = SoftTargetCrossEntropy
            .forward(&student, &one_hot(&[0, 1], 3).unwrap())
            .unwrap();
        assert_relative_eq!(out.loss, ce, epsilon = 1e-6);
    }

    #[test]
    fn test_temperature_changes_loss() {
        let (student, teacher, _, _) = fixture();
        let targets = Targets::Hard(vec![0, 1]);
        let cold = DistillationLoss::new(1.0, 1.0).unwrap();
        let hot = DistillationLoss::new(5.0, 1.0).unwrap();

        let a = cold.vanilla(&student, &teacher, &targets).unwrap();
        let b = hot.vanilla(&student, &teacher, &targets).unwrap();
        assert!((a - b).abs() > 1e-4);
    }

    #[test]
    fn test_vanilla_gradient_matches_finite_difference() {
        let (student, teacher, _, _) = fixture();
        let targets = Targets::Soft(array![[0.8, 0.1, 0.1], [0.0, 0.3, 0.7]]);
        let loss_fn = DistillationLoss::new(2.0, 0.7).unwrap();
        let out = loss_fn.vanilla_with_grad(&student, &teacher, &targets).unwrap();

        let h = 1e-2;
        for idx in [[0_usize, 0], [0, 2], [1, 1], [1, 2]] {
            let mut plus = student.clone();
            let mut minus = student.clone();
            plus[idx] += h;
            minus[idx] -= h;
            let numeric = (loss_fn.vanilla(&plus, &teacher, &targets).unwrap()
                - loss_fn.vanilla(&minus, &teacher, &targets).unwrap())
                / (2.0 * h);
            assert_relative_eq!(out.grad_student[idx], numeric, epsilon = 2e-3);
        }
    }

    #[test]
    fn test_augmented_gradient_matches_finite_difference() {
        let (student, teacher, student_aug, teacher_aug) = fixture();
        let targets = Targets::Hard(vec![0, 2]);
        let loss_fn = DistillationLoss::new(3.0, 0.5)
            .unwrap()
            .with_kl(KlDivLoss::new(Reduction::Sum, false));
        let out = loss_fn
            .augmented_with_grad(&student, &teacher, &teacher_aug, &student_aug, &targets)
            .unwrap();
        let grad_aug = out.grad_student_aug.unwrap();

        let loss_at = |s: &Array2<f32>, sa: &Array2<f32>| {
            loss_fn
                .augmented(s, &teacher, &teacher_aug, sa, &targets)
                .unwrap()
        };

        let h = 1e-2;
        for idx in [[0_usize, 1], [1, 0]] {
            let mut plus = student.clone();
            let mut minus = student.clone();
            plus[idx] += h;
            minus[idx] -= h;
            let numeric = (loss_at(&plus, &student_aug) - loss_at(&minus, &student_aug)) / (2.0 * h);
            assert_relative_eq!(out.grad_student[idx], numeric, epsilon = 2e-3);

            let mut plus = student_aug.clone();
            let mut minus = student_aug.clone();
            plus[idx] += h;
            minus[idx] -= h;
            let numeric = (loss_at(&student, &plus) - loss_at(&student, &minus)) / (2.0 * h);
            assert_relative_eq!(grad_aug[idx], numeric, epsilon = 2e-3);
        }
    }

    #[test]
    fn test_label_smoothing_raises_loss_for_confident_student() {
        let student = array![[8.0, 0.0, 0.0]];
        let targets = Targets::Hard(vec![0]);
        let plain = DistillationLoss::new(4.0, 0.0).unwrap();
        let smooth = plain.clone().with_label_smoothing(0.1).unwrap();

        let a = plain.vanilla(&student, &student, &targets).unwrap();
        let b = smooth.vanilla(&student, &student, &targets).unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_compute_dispatches_on_mode() {
        let (student, teacher, student_aug, teacher_aug) = fixture();
        let inputs = DistillInputs {
            student: student.clone(),
            teacher: teacher.clone(),
            student_aug: Some(student_aug.clone()),
            teacher_aug: Some(teacher_aug.clone()),
            targets: Targets::Hard(vec![0, 2]),
        };
        let loss_fn = DistillationLoss::default();

        let vanilla = loss_fn.compute(DistillMode::Vanilla, &inputs).unwrap();
        let augmented = loss_fn.compute(DistillMode::Augmented, &inputs).unwrap();

        assert_relative_eq!(
            vanilla.loss,
            loss_fn.vanilla(&student, &teacher, &inputs.targets).unwrap(),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            augmented.loss,
            loss_fn
                .augmented(&student, &teacher, &teacher_aug, &student_aug, &inputs.targets)
                .unwrap(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_augmented_mode_requires_augmented_logits() {
        let (student, teacher, student_aug, _) = fixture();
        let inputs = DistillInputs {
            student,
            teacher,
            student_aug: Some(student_aug),
            teacher_aug: None,
            targets: Targets::Hard(vec![0, 1]),
        };
        let err = DistillationLoss::default()
            .compute(DistillMode::Augmented, &inputs)
            .unwrap_err();
        assert!(matches!(err, DestilarError::MissingInput { ref input, .. } if input == "teacher_aug"));
    }

    #[test]
    fn test_shape_mismatch_is_error() {
        let student = Array2::<f32>::zeros((2, 3));
        let teacher = Array2::<f32>::zeros((2, 4));
        let err = DistillationLoss::default()
            .vanilla(&student, &teacher, &Targets::Hard(vec![0, 1]))
            .unwrap_err();
        assert!(matches!(err, DestilarError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_augmented_class_mismatch_is_error() {
        let (student, teacher, _, _) = fixture();
        let aug = Array2::<f32>::zeros((2, 4));
        let err = DistillationLoss::default()
            .augmented(&student, &teacher, &aug, &aug, &Targets::Hard(vec![0, 1]))
            .unwrap_err();
        assert!(matches!(err, DestilarError::ShapeMismatch { ref input, .. } if input == "student_aug"));
    }

    #[test]
    fn test_label_count_mismatch_is_error() {
        let (student, teacher, _, _) = fixture();
        let err = DistillationLoss::default()
            .vanilla(&student, &teacher, &Targets::Hard(vec![0]))
            .unwrap_err();
        assert!(matches!(err, DestilarError::ShapeMismatch { ref input, .. } if input == "targets"));
    }

    #[test]
    fn test_empty_batch_is_error() {
        let empty = Array2::<f32>::zeros((0, 3));
        let err = DistillationLoss::default()
            .vanilla(&empty, &empty, &Targets::Hard(vec![]))
            .unwrap_err();
        assert!(matches!(err, DestilarError::EmptyBatch { ref input, .. } if input == "student"));
    }

    #[test]
    fn test_empty_augmented_batch_names_student_aug() {
        let (student, teacher, _, _) = fixture();
        let empty = Array2::<f32>::zeros((0, 3));
        let err = DistillationLoss::default()
            .augmented(&student, &teacher, &empty, &empty, &Targets::Hard(vec![0, 1]))
            .unwrap_err();
        assert!(matches!(err, DestilarError::EmptyBatch { ref input, .. } if input == "student_aug"));
    }

    #[test]
    fn test_invalid_hyperparameters_rejected() {
        assert!(DistillationLoss::new(0.0, 0.5).is_err());
        assert!(DistillationLoss::new(-1.0, 0.5).is_err());
        assert!(DistillationLoss::new(f32::NAN, 0.5).is_err());
        assert!(DistillationLoss::new(4.0, 1.5).is_err());
        assert!(DistillationLoss::default().with_label_smoothing(1.0).is_err());
    }

    #[test]
    fn test_breakdown_total_sums_terms() {
        let b = LossBreakdown {
            cross_entropy: 1.0,
            kl: 0.25,
            kl_aug: Some(0.5),
        };
        assert_relative_eq!(b.total(), 1.75);
    }

    mod loss_props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_loss_non_negative_and_finite(
                s in proptest::collection::vec(-30.0_f32..30.0, 8),
                t in proptest::collection::vec(-30.0_f32..30.0, 8),
                label in 0_usize..4,
                temperature in 0.5_f32..10.0,
                weight in 0.0_f32..=1.0,
            ) {
                let student = Array2::from_shape_vec((2, 4), s).unwrap();
                let teacher = Array2::from_shape_vec((2, 4), t).unwrap();
                let loss_fn = DistillationLoss::new(temperature, weight).unwrap();
                let out = loss_fn
                    .vanilla_with_grad(&student, &teacher, &Targets::Hard(vec![label, 3 - label]))
                    .unwrap();

                prop_assert!(out.loss.is_finite());
                prop_assert!(out.loss >= -1e-4);
                prop_assert!(out.grad_student.iter().all(|g| g.is_finite()));
            }

            #[test]
            fn prop_gradient_rows_sum_to_zero(
                s in proptest::collection::vec(-10.0_f32..10.0, 6),
                t in proptest::collection::vec(-10.0_f32..10.0, 6),
            ) {
                // unit-mass targets and distributions make each row's gradient sum to zero
                let student = Array2::from_shape_vec((2, 3), s).unwrap();
                let teacher = Array2::from_shape_vec((2, 3), t).unwrap();
                let out = DistillationLoss::default()
                    .vanilla_with_grad(&student, &teacher, &Targets::Hard(vec![0, 1]))
                    .unwrap();
                for row in out.grad_student.rows() {
                    prop_assert!(row.sum().abs() < 1e-4);
                }
            }
        }
    }
}
