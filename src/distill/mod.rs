//! Knowledge Distillation
//!
//! Loss functions for training a student network against a teacher's
//! outputs. Everything here operates on pre-computed logit matrices of shape
//! `[batch, classes]` and returns scalar losses plus analytic gradients with
//! respect to the student logits.
//!
//! ## Features
//!
//! - **Temperature-scaled KL divergence** between softened teacher and
//!   student distributions
//! - **Soft-target cross-entropy** for mixup and label-smoothed targets
//! - **Augmentation alignment**: a second KL term on teacher/student outputs
//!   for augmented inputs
//!
//! ## Example
//!
//! ```
//! use destilar::distill::{DistillationLoss, Targets};
//! use ndarray::array;
//!
//! let loss_fn = DistillationLoss::default();
//! let student = array![[2.0, 1.0, 0.5]];
//! let teacher = array![[1.5, 1.2, 0.8]];
//! let student_aug = array![[1.7, 1.1, 0.2]];
//! let teacher_aug = array![[1.2, 1.4, 0.3]];
//!
//! let loss = loss_fn
//!     .augmented(&student, &teacher, &teacher_aug, &student_aug, &Targets::Hard(vec![0]))
//!     .unwrap();
//! assert!(loss.is_finite());
//! ```

mod cross_entropy;
pub mod functional;
mod kl_div;
mod loss;

pub use cross_entropy::{
    mixup_targets, one_hot, smoothed_one_hot, LabelSmoothingCrossEntropy, SoftTargetCrossEntropy,
    Targets,
};
pub use kl_div::{KlDivLoss, Reduction};
pub use loss::{DistillInputs, DistillMode, DistillationLoss, LossBreakdown, LossOutput};
