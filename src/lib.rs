//! # destilar
//!
//! Knowledge-distillation losses for training a student network against a
//! teacher network's outputs.
//!
//! The crate evaluates the composite objective
//!
//! ```text
//! L = CE(student, y) + w·T²·KL(student/T ‖ teacher/T) [+ w·T²·KL(student'/T ‖ teacher'/T)]
//! ```
//!
//! over pre-computed logit matrices, in a vanilla form and in an augmented
//! form that also aligns teacher and student outputs on augmented inputs.
//! Each evaluation also yields the gradient with respect to the student
//! logits so the loss can be plugged into an external training loop.
//!
//! ## Modules
//!
//! - [`distill`]: loss functions and numeric kernels
//! - [`config`]: YAML loss configuration and validation
//! - [`io`]: logit batch files
//! - [`cli`]: the `destilar` command-line interface

pub mod cli;
pub mod config;
pub mod distill;
pub mod io;

pub use config::LossConfig;
pub use destilar_common::{DestilarError, Result};
pub use distill::{DistillInputs, DistillMode, DistillationLoss, LossOutput, Targets};
