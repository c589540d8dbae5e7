//! Compute command implementation

use destilar_common::cli::styles;
use destilar_common::{DestilarError, OutputFormat, Result};
use ndarray::Array2;
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::cli::ComputeArgs;
use crate::config::{ConfigValidator, LossConfig};
use crate::distill::{DistillMode, LossBreakdown};
use crate::io::load_batch;

/// Result of evaluating a loss over one batch file.
#[derive(Debug, Clone, Serialize)]
pub struct ComputeReport {
    /// Objective that was evaluated
    pub mode: DistillMode,
    /// Temperature used
    pub temperature: f32,
    /// Distil weight used
    pub distil_weight: f32,
    /// `[batch, classes]` of the clean logits
    pub shape: [usize; 2],
    /// Scalar loss
    pub loss: f32,
    /// Weighted terms
    pub breakdown: LossBreakdown,
    /// dL/d(student logits), when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grad_student: Option<Vec<Vec<f32>>>,
    /// dL/d(augmented student logits), when requested in augmented mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grad_student_aug: Option<Vec<Vec<f32>>>,
}

/// Load a config and batch, validate, and evaluate the loss.
pub fn compute_report(
    config_path: &Path,
    batch_path: &Path,
    mode: Option<DistillMode>,
    with_grad: bool,
) -> Result<ComputeReport> {
    let mut config = LossConfig::from_file(config_path)?;
    if let Some(mode) = mode {
        config.mode = mode;
    }
    ConfigValidator::validate(&config)?;

    let loss_fn = config.build()?;
    let inputs = load_batch(batch_path)?;
    info!(
        mode = %config.mode,
        batch = inputs.student.nrows(),
        classes = inputs.student.ncols(),
        "evaluating distillation loss"
    );

    let out = loss_fn.compute(config.mode, &inputs)?;
    if !out.loss.is_finite() {
        return Err(DestilarError::NonFiniteLoss {
            mode: config.mode.to_string(),
            temperature: config.temperature,
            loss: out.loss,
        });
    }

    Ok(ComputeReport {
        mode: config.mode,
        temperature: config.temperature,
        distil_weight: config.distil_weight,
        shape: [inputs.student.nrows(), inputs.student.ncols()],
        loss: out.loss,
        breakdown: out.breakdown,
        grad_student: with_grad.then(|| to_rows(&out.grad_student)),
        grad_student_aug: if with_grad {
            out.grad_student_aug.as_ref().map(to_rows)
        } else {
            None
        },
    })
}

/// Human-readable rendering of a report.
pub fn render_text(report: &ComputeReport) -> String {
    let mut lines = vec![
        format!("  Mode: {}", report.mode),
        format!("  Temperature: {}", report.temperature),
        format!("  Distil weight: {}", report.distil_weight),
        format!("  Batch: {} x {}", report.shape[0], report.shape[1]),
        format!("  Cross-entropy: {:.6}", report.breakdown.cross_entropy),
        format!("  KL: {:.6}", report.breakdown.kl),
    ];
    if let Some(kl_aug) = report.breakdown.kl_aug {
        lines.push(format!("  KL (augmented): {kl_aug:.6}"));
    }
    lines.push(format!("  Loss: {:.6}", report.loss));

    for (label, grad) in [
        ("Gradient (student)", &report.grad_student),
        ("Gradient (student_aug)", &report.grad_student_aug),
    ] {
        if let Some(rows) = grad {
            lines.push(format!("  {label}:"));
            lines.extend(rows.iter().map(|row| {
                let cells: Vec<String> = row.iter().map(|g| format!("{g:+.6}")).collect();
                format!("    [{}]", cells.join(", "))
            }));
        }
    }

    lines.join("\n")
}

pub(super) fn run_compute(args: &ComputeArgs, cli: &destilar_common::Cli) -> Result<()> {
    let report = compute_report(&args.config, &args.batch, args.mode, args.grad)?;

    match cli.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).map_err(|e| {
                DestilarError::Serialization {
                    message: e.to_string(),
                }
            })?;
            println!("{json}");
        }
        OutputFormat::Text => {
            if !cli.is_quiet() {
                println!("{}", styles::header("destilar compute"));
            }
            println!("{}", render_text(&report));
        }
    }

    Ok(())
}

fn to_rows(grad: &Array2<f32>) -> Vec<Vec<f32>> {
    grad.rows().into_iter().map(|r| r.to_vec()).collect()
}
