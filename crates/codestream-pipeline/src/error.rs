//! Pipeline error types

use codestream_store::StoreError;
use codestream_timer::TimerError;
use thiserror::Error;

/// Failure of a single pipeline phase
#[derive(Debug, Error)]
#[error("phase {phase} failed: {reason}")]
pub struct PhaseError {
    /// Name of the failing phase
    pub phase: &'static str,
    /// Failure reason
    pub reason: String,
}

impl PhaseError {
    /// Build a phase failure
    pub fn new(phase: &'static str, reason: impl Into<String>) -> Self {
        Self {
            phase,
            reason: reason.into(),
        }
    }
}

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A phase function failed; remaining phases were aborted
    #[error(transparent)]
    Phase(#[from] PhaseError),

    /// A persistence phase failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Timer misuse; indicates a bug in phase sequencing
    #[error("timer error: {0}")]
    Timer(#[from] TimerError),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
