//! Loss configuration.
//!
//! A YAML file selects the distillation objective and its hyperparameters so
//! the CLI can evaluate a batch without code changes.

mod schema;
mod validation;

pub use schema::LossConfig;
pub use validation::ConfigValidator;
