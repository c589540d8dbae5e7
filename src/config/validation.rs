//! Configuration validation.
//!
//! Catches bad hyperparameters before any logits are read and explains how
//! to fix them.

use destilar_common::{DestilarError, Result};

use super::LossConfig;

/// Largest temperature accepted; above this the soft targets are nearly uniform.
const MAX_TEMPERATURE: f32 = 20.0;

/// Validator for [`LossConfig`].
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a loss configuration.
    ///
    /// Returns `Ok(())` if valid, or an error with an actionable suggestion.
    pub fn validate(config: &LossConfig) -> Result<()> {
        Self::validate_temperature(config.temperature)?;
        Self::validate_distil_weight(config.distil_weight)?;
        Self::validate_label_smoothing(config.label_smoothing)?;
        Ok(())
    }

    fn validate_temperature(temperature: f32) -> Result<()> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(DestilarError::ConfigValue {
                field: "temperature".into(),
                message: format!("Temperature must be positive, got {temperature}"),
                suggestion: "Use temperature 1.0-8.0 (4.0 recommended)".into(),
            });
        }

        if temperature > MAX_TEMPERATURE {
            return Err(DestilarError::ConfigValue {
                field: "temperature".into(),
                message: format!("Temperature too high: {temperature}"),
                suggestion: "Use temperature 1.0-8.0; higher values over-smooth distributions"
                    .into(),
            });
        }

        Ok(())
    }

    fn validate_distil_weight(weight: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(DestilarError::ConfigValue {
                field: "distil_weight".into(),
                message: format!("Distil weight must be between 0 and 1, got {weight}"),
                suggestion: "Use 0.5 to weigh soft and hard terms equally".into(),
            });
        }
        Ok(())
    }

    fn validate_label_smoothing(smoothing: f32) -> Result<()> {
        if !(0.0..1.0).contains(&smoothing) {
            return Err(DestilarError::ConfigValue {
                field: "label_smoothing".into(),
                message: format!("Label smoothing must be in [0, 1), got {smoothing}"),
                suggestion: "Use 0.0 to disable or 0.1 for typical smoothing".into(),
            });
        }
        Ok(())
    }
}
