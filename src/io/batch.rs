//! Logit batch files
//!
//! A batch file carries the pre-computed teacher and student outputs for
//! one loss evaluation:
//!
//! ```json
//! {
//!   "student":     [[2.0, 1.0, 0.5]],
//!   "teacher":     [[1.5, 1.2, 0.8]],
//!   "student_aug": [[1.7, 1.1, 0.2]],
//!   "teacher_aug": [[1.2, 1.4, 0.3]],
//!   "labels":      [0]
//! }
//! ```
//!
//! Exactly one of `labels` (class indices) or `targets` (per-row
//! distributions) must be present. The augmented pair is optional.

use destilar_common::{DestilarError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::distill::{DistillInputs, Targets};

/// Serialization format of a batch file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchFormat {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl BatchFormat {
    /// Detect the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Raw batch file contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogitsBatch {
    /// Student logits on clean inputs
    pub student: Vec<Vec<f32>>,
    /// Teacher logits on clean inputs
    pub teacher: Vec<Vec<f32>>,
    /// Student logits on augmented inputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_aug: Option<Vec<Vec<f32>>>,
    /// Teacher logits on augmented inputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_aug: Option<Vec<Vec<f32>>>,
    /// Hard labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<usize>>,
    /// Soft targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<Vec<f32>>>,
}

impl LogitsBatch {
    /// Convert to loss inputs. `path` is only used for error messages.
    pub fn into_inputs(self, path: &Path) -> Result<DistillInputs> {
        let invalid = |message: String| DestilarError::BatchFormat {
            path: path.to_path_buf(),
            message,
        };

        let targets = match (self.labels, self.targets) {
            (Some(labels), None) => Targets::Hard(labels),
            (None, Some(rows)) => Targets::Soft(to_matrix("targets", rows).map_err(invalid)?),
            (Some(_), Some(_)) => {
                return Err(invalid("set either 'labels' or 'targets', not both".into()))
            }
            (None, None) => return Err(invalid("missing 'labels' or 'targets'".into())),
        };

        Ok(DistillInputs {
            student: to_matrix("student", self.student).map_err(invalid)?,
            teacher: to_matrix("teacher", self.teacher).map_err(invalid)?,
            student_aug: self
                .student_aug
                .map(|rows| to_matrix("student_aug", rows))
                .transpose()
                .map_err(invalid)?,
            teacher_aug: self
                .teacher_aug
                .map(|rows| to_matrix("teacher_aug", rows))
                .transpose()
                .map_err(invalid)?,
            targets,
        })
    }
}

/// Read and convert a batch file.
///
/// # Example
///
/// ```no_run
/// use destilar::io::load_batch;
///
/// let inputs = load_batch("batch.json").expect("failed to load batch");
/// println!("batch of {} samples", inputs.student.nrows());
/// ```
pub fn load_batch(path: impl AsRef<Path>) -> Result<DistillInputs> {
    let path = path.as_ref();

    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("json");
    let format = BatchFormat::from_extension(ext).ok_or_else(|| DestilarError::BatchFormat {
        path: path.to_path_buf(),
        message: format!("unsupported file extension '.{ext}', use .json or .yaml"),
    })?;

    let content = std::fs::read_to_string(path)
        .map_err(|e| DestilarError::io(format!("reading batch file: {}", path.display()), e))?;

    let batch: LogitsBatch = match format {
        BatchFormat::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
        BatchFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
    }
    .map_err(|message| DestilarError::BatchFormat {
        path: path.to_path_buf(),
        message,
    })?;

    batch.into_inputs(path)
}

/// Pack nested rows into a `[rows, cols]` matrix, rejecting ragged rows and
/// NaN or infinite values.
fn to_matrix(name: &str, rows: Vec<Vec<f32>>) -> std::result::Result<Array2<f32>, String> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);

    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
        return Err(format!(
            "'{name}' row {i} has {} values, expected {ncols}",
            row.len()
        ));
    }

    if let Some(i) = rows.iter().position(|r| r.iter().any(|v| !v.is_finite())) {
        return Err(format!("'{name}' row {i} contains a non-finite value"));
    }

    let flat: Vec<f32> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((nrows, ncols), flat).map_err(|e| format!("'{name}': {e}"))
}
