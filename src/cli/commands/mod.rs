//! CLI command implementations

mod compute;
mod init;
mod validate;

use destilar_common::Result;
use tracing::debug;

use super::{Cli, Command};

pub use compute::{compute_report, render_text, ComputeReport};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<()> {
    let settings = cli.common.to_cli();
    settings.init_tracing();
    debug!(verbosity = settings.verbosity, format = %settings.format, "starting destilar");

    match cli.command {
        Command::Compute(args) => compute::run_compute(&args, &settings),
        Command::Validate(args) => validate::run_validate(&args, &settings),
        Command::Init(args) => init::run_init(&args, &settings),
    }
}
