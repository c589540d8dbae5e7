//! YAML schema for distillation loss configuration

use destilar_common::{DestilarError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::distill::{DistillMode, DistillationLoss, KlDivLoss, Reduction};

/// Accept a YAML boolean or the quoted strings `"true"`/`"false"`.
fn deserialize_bool_lenient<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Str(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::Str(s) => match s.to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected 'true' or 'false', got '{other}'"
            ))),
        },
    }
}

/// Distillation loss configuration.
///
/// ```yaml
/// mode: augmented
/// temperature: 4.0
/// distil_weight: 0.5
/// reduction: batchmean
/// log_target: true
/// label_smoothing: 0.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LossConfig {
    /// Objective to evaluate
    #[serde(default)]
    pub mode: DistillMode,
    /// Temperature for soft targets
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Weight on each KL term
    #[serde(default = "default_distil_weight")]
    pub distil_weight: f32,
    /// Reduction applied by the KL criterion
    #[serde(default)]
    pub reduction: Reduction,
    /// Whether the KL target is passed as log-probabilities
    #[serde(default = "bool_true", deserialize_with = "deserialize_bool_lenient")]
    pub log_target: bool,
    /// Label smoothing for hard labels
    #[serde(default)]
    pub label_smoothing: f32,
}

fn default_temperature() -> f32 {
    4.0
}

fn default_distil_weight() -> f32 {
    0.5
}

fn bool_true() -> bool {
    true
}

impl Default for LossConfig {
    fn default() -> Self {
        Self {
            mode: DistillMode::default(),
            temperature: default_temperature(),
            distil_weight: default_distil_weight(),
            reduction: Reduction::default(),
            log_target: true,
            label_smoothing: 0.0,
        }
    }
}

impl LossConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DestilarError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| DestilarError::io(format!("reading config file: {}", path.display()), e))?;

        Self::from_yaml(&content, path)
    }

    /// Parse configuration from a YAML string. `path` is only used for
    /// error messages.
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| DestilarError::ConfigParsing {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| DestilarError::Serialization {
            message: e.to_string(),
        })
    }

    /// Default configuration for the given mode.
    pub fn for_mode(mode: DistillMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Build the loss function described by this configuration.
    pub fn build(&self) -> Result<DistillationLoss> {
        DistillationLoss::new(self.temperature, self.distil_weight)?
            .with_kl(KlDivLoss::new(self.reduction, self.log_target))
            .with_label_smoothing(self.label_smoothing)
    }
}
