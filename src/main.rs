//! Destilar CLI
//!
//! # Usage
//!
//! ```bash
//! # Write a starting configuration
//! destilar init --mode augmented > loss.yaml
//!
//! # Validate it
//! destilar validate --config loss.yaml
//!
//! # Evaluate the loss (and gradients) over a batch of logits
//! destilar compute --config loss.yaml --batch batch.json --grad --format json
//! ```

use clap::Parser;
use destilar::cli::{run_command, Cli};
use destilar_common::cli::styles;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", styles::error(&format!("[{}] {e}", e.code())));
            ExitCode::FAILURE
        }
    }
}
