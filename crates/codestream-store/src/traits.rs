//! Reader/writer traits for the store surface

use crate::error::StoreResult;
use crate::types::{CloneDoc, StatusEntry};

/// Read surface consumed by the monitor and the report pages.
///
/// Counters are monotonically non-decreasing in a healthy store; readers
/// must tolerate a value equal to or transiently below a previous read.
pub trait StoreReader: Send + Sync {
    /// Number of processed files
    fn files_count(&self) -> StoreResult<u64>;

    /// Names of processed files, in processing order
    fn file_names(&self) -> StoreResult<Vec<String>>;

    /// Number of chunks produced by preprocessing
    fn chunks_count(&self) -> StoreResult<u64>;

    /// Number of clone candidates identified
    fn candidates_count(&self) -> StoreResult<u64>;

    /// Number of confirmed clones
    fn clones_count(&self) -> StoreResult<u64>;

    /// All confirmed clone documents
    fn clones(&self) -> StoreResult<Vec<CloneDoc>>;

    /// Full status log, newest entry first
    fn status_log(&self) -> StoreResult<Vec<StatusEntry>>;
}

/// Write surface consumed by the pipeline
pub trait StoreWriter: Send + Sync {
    /// Record one processed file
    fn add_file(&self, name: &str) -> StoreResult<()>;

    /// Add to the chunk counter
    fn add_chunks(&self, count: u64) -> StoreResult<()>;

    /// Add to the candidate counter
    fn add_candidates(&self, count: u64) -> StoreResult<()>;

    /// Append confirmed clone documents
    fn add_clones(&self, clones: Vec<CloneDoc>) -> StoreResult<()>;

    /// Append a status-log message, stamped with the current time
    fn push_status(&self, message: &str) -> StoreResult<()>;
}
