//! Batch file loading.

mod batch;

pub use batch::{load_batch, BatchFormat, LogitsBatch};
