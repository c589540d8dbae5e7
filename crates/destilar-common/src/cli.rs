//! Shared CLI arguments, output formats and log initialisation.

use clap::Args;
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}', expected text or json")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Flags accepted by every destilar command.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output (errors are still reported on stderr)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format: text or json
    #[arg(long, default_value = "text", global = true)]
    pub format: OutputFormat,
}

impl CommonArgs {
    /// Resolve parsed flags into the runtime CLI settings.
    pub fn to_cli(&self) -> Cli {
        Cli {
            verbosity: if self.quiet { 0 } else { 1 + self.verbose },
            format: self.format,
        }
    }
}

/// Runtime CLI settings derived from [`CommonArgs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cli {
    /// 0 = quiet, 1 = normal, 2 = debug, 3+ = trace
    pub verbosity: u8,
    /// Selected output format
    pub format: OutputFormat,
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            verbosity: 1,
            format: OutputFormat::Text,
        }
    }
}

impl Cli {
    /// Whether normal output should be suppressed.
    pub fn is_quiet(&self) -> bool {
        self.verbosity == 0
    }

    /// Default log directive for this verbosity.
    pub fn log_directive(&self) -> &'static str {
        match self.verbosity {
            0 => "error",
            1 => "warn",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Install a stderr `tracing` subscriber.
    ///
    /// `RUST_LOG` takes precedence over the verbosity flags. Calling this
    /// twice is harmless; the second install is ignored.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_directive()));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Consistent message prefixes for terminal output.
pub mod styles {
    /// Section header.
    pub fn header(text: &str) -> String {
        format!("== {text} ==")
    }

    /// Successful outcome.
    pub fn success(text: &str) -> String {
        format!("✓ {text}")
    }

    /// Error report.
    pub fn error(text: &str) -> String {
        format!("✗ {text}")
    }
}
