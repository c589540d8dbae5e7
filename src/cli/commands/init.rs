//! Init command implementation

use destilar_common::{DestilarError, OutputFormat, Result};

use crate::cli::InitArgs;
use crate::config::LossConfig;

pub(super) fn run_init(args: &InitArgs, cli: &destilar_common::Cli) -> Result<()> {
    let config = LossConfig::for_mode(args.mode);

    match cli.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&config).map_err(|e| {
                DestilarError::Serialization {
                    message: e.to_string(),
                }
            })?;
            println!("{json}");
        }
        OutputFormat::Text => print!("{}", config.to_yaml()?),
    }

    Ok(())
}
