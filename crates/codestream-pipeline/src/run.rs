//! Unit of work carried through the pipeline

use codestream_store::CloneDoc;
use codestream_timer::TimerSet;

/// One source file submitted for analysis.
///
/// Owned exclusively by the pipeline invocation processing it; concurrent
/// runs never share state. Phase functions take the run by value and hand
/// back the transformed run.
#[derive(Debug)]
pub struct Run {
    /// Process-unique run id
    pub id: u64,
    /// Submitted file name
    pub name: String,
    /// File content
    pub content: String,
    /// Number of lines in the submitted content
    pub line_count: usize,
    /// Phase timers for this run
    pub timers: TimerSet,
    /// Chunks produced by preprocessing
    pub chunk_count: u64,
    /// Clone candidates flagged by match detection
    pub candidate_count: u64,
    /// Confirmed clones found in this run
    pub clones: Vec<CloneDoc>,
}

impl Run {
    /// Build a run from an incoming `(name, content)` pair
    pub fn new(id: u64, name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let line_count = content.lines().count();
        Self {
            id,
            name: name.into(),
            content,
            line_count,
            timers: TimerSet::new(),
            chunk_count: 0,
            candidate_count: 0,
            clones: Vec::new(),
        }
    }
}
