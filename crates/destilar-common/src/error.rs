//! Error types with actionable diagnostics.
//!
//! Every variant carries enough context to fix the problem without reading
//! the source: which input, which shape, which field.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for destilar operations.
pub type Result<T> = std::result::Result<T, DestilarError>;

/// Errors that can occur while configuring or evaluating a distillation loss.
#[derive(Error, Debug)]
pub enum DestilarError {
    /// Configuration file not found at expected path.
    #[error("Configuration file not found: {path}\n  → Run `destilar init > loss.yaml` or pass --config with a different path")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file has invalid syntax.
    #[error("Invalid configuration syntax in {path}:\n  {message}\n  → Check YAML syntax at the indicated line")]
    ConfigParsing { path: PathBuf, message: String },

    /// Configuration value is invalid.
    #[error("Invalid configuration value for '{field}': {message}\n  → {suggestion}")]
    ConfigValue {
        field: String,
        message: String,
        suggestion: String,
    },

    /// Two logit/target matrices that must agree do not.
    #[error("Shape mismatch for {input}: expected {expected:?}, got {actual:?}\n  → Teacher, student and target matrices must all be [batch, classes]")]
    ShapeMismatch {
        input: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A hard label does not index a valid class.
    #[error("Label {label} at row {row} is out of range for {num_classes} classes\n  → Labels must be class indices in [0, {num_classes})")]
    LabelOutOfRange {
        row: usize,
        label: usize,
        num_classes: usize,
    },

    /// Loss evaluated over zero samples or zero classes.
    #[error("Empty batch: {input} has shape {shape:?}\n  → Provide at least one sample with at least one class")]
    EmptyBatch { input: String, shape: Vec<usize> },

    /// An input required by the selected mode is absent.
    #[error("Missing input '{input}' required for {mode} distillation\n  → Supply {input} or switch mode to vanilla")]
    MissingInput { input: String, mode: String },

    /// Loss overflowed for finite logits.
    #[error("Loss for {mode} distillation is {loss} at temperature {temperature}\n  → Logits scaled by 1/temperature overflow f32; rescale the logits or raise the temperature")]
    NonFiniteLoss {
        mode: String,
        temperature: f32,
        loss: f32,
    },

    /// Batch file content is structurally invalid.
    #[error("Invalid batch file {path}: {message}\n  → See `destilar compute --help` for the expected JSON layout")]
    BatchFormat { path: PathBuf, message: String },

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic error for unexpected conditions.
    #[error("Internal error: {message}\n  → Please report this bug at https://github.com/paiml/destilar/issues")]
    Internal { message: String },
}

impl DestilarError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a shape mismatch error for the named input.
    pub fn shape(input: impl Into<String>, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            input: input.into(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Check if this error is user-recoverable.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Io { .. } | Self::Internal { .. })
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigNotFound { .. } => "E001",
            Self::ConfigParsing { .. } => "E002",
            Self::ConfigValue { .. } => "E003",
            Self::ShapeMismatch { .. } => "E010",
            Self::LabelOutOfRange { .. } => "E011",
            Self::EmptyBatch { .. } => "E012",
            Self::MissingInput { .. } => "E013",
            Self::NonFiniteLoss { .. } => "E014",
            Self::BatchFormat { .. } => "E020",
            Self::Io { .. } => "E050",
            Self::Serialization { .. } => "E051",
            Self::Internal { .. } => "E999",
        }
    }
}
