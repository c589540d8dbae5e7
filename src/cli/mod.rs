//! CLI module for destilar
//!
//! Argument definitions and command handlers for the `destilar` binary.

mod commands;

use clap::{Args, Parser, Subcommand};
use destilar_common::CommonArgs;
use std::path::PathBuf;

use crate::distill::DistillMode;

pub use commands::{compute_report, render_text, run_command, ComputeReport};

/// Evaluate knowledge-distillation losses over pre-computed logits
#[derive(Debug, Parser)]
#[command(name = "destilar")]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate the configured loss over a batch file
    Compute(ComputeArgs),
    /// Validate a loss configuration file
    Validate(ValidateArgs),
    /// Print a default loss configuration (YAML, or JSON with --format json)
    Init(InitArgs),
}

/// Arguments for `destilar compute`.
#[derive(Debug, Clone, Args)]
pub struct ComputeArgs {
    /// Path to the loss configuration (YAML)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Path to the batch file (JSON or YAML) with student/teacher logits
    #[arg(short, long)]
    pub batch: PathBuf,

    /// Override the configured mode
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<DistillMode>,

    /// Also report gradients with respect to the student logits
    #[arg(long)]
    pub grad: bool,
}

/// Arguments for `destilar validate`.
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Path to the loss configuration (YAML)
    #[arg(short, long)]
    pub config: PathBuf,
}

/// Arguments for `destilar init`.
#[derive(Debug, Clone, Args)]
pub struct InitArgs {
    /// Objective to configure: vanilla or augmented
    #[arg(long, default_value = "augmented", value_parser = parse_mode)]
    pub mode: DistillMode,
}

fn parse_mode(s: &str) -> Result<DistillMode, String> {
    match s.to_ascii_lowercase().as_str() {
        "vanilla" => Ok(DistillMode::Vanilla),
        "augmented" => Ok(DistillMode::Augmented),
        other => Err(format!("unknown mode '{other}', expected vanilla or augmented")),
    }
}
