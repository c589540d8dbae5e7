//! Validate command implementation

use destilar_common::cli::styles;
use destilar_common::Result;

use crate::cli::ValidateArgs;
use crate::config::{ConfigValidator, LossConfig};

/// Format a configuration summary as a string
pub fn format_config_info(config: &LossConfig) -> String {
    [
        format!("  Mode: {}", config.mode),
        format!("  Temperature: {}", config.temperature),
        format!("  Distil weight: {}", config.distil_weight),
        format!(
            "  KL: reduction={:?}, log_target={}",
            config.reduction, config.log_target
        ),
        format!("  Label smoothing: {}", config.label_smoothing),
    ]
    .join("\n")
}

pub(super) fn run_validate(args: &ValidateArgs, cli: &destilar_common::Cli) -> Result<()> {
    let config = LossConfig::from_file(&args.config)?;
    ConfigValidator::validate(&config)?;

    if !cli.is_quiet() {
        println!("{}", styles::success("Configuration valid"));
        println!("{}", format_config_info(&config));
    }

    Ok(())
}
