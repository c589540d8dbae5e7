//! Shared infrastructure for destilar tools.
//!
//! - Error handling with actionable diagnostics
//! - Common CLI flags, output formats and `tracing` setup

pub mod cli;
pub mod error;

pub use cli::{Cli, CommonArgs, OutputFormat};
pub use error::{DestilarError, Result};
