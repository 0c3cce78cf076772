//! Phase-completion detection over the status log
//!
//! The batch detector reports progress as free-text status messages. Phase
//! state is re-derived from the full log on every poll, never carried as
//! mutable flags, so a restarted sampler reaches the same classification
//! from the same log.

use codestream_store::StatusEntry;
use regex::Regex;
use std::sync::OnceLock;

/// Marker (prefix match): chunk processing has finished
pub const PROCESSING_CHUNKS_DONE: &str = "Identifying Clone Candidates...";

/// Marker (exact match): candidate expansion has finished
pub const EXPANDING_CANDIDATES_DONE: &str = "Summary";

fn candidates_found_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Found (\d+) candidates").expect("static regex"))
}

/// Derived phase state, a pure function of the status log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseState {
    /// Chunk processing finished; chunk sampling freezes
    pub chunking_done: bool,
    /// Candidate identification finished, with the reported total
    pub candidates_found: Option<u64>,
    /// Candidate expansion finished; candidate/clone sampling freezes
    pub expansion_done: bool,
}

/// Classify pipeline-phase completion from the full status log.
///
/// Entry order does not matter; the markers are scanned, not replayed.
pub fn classify(log: &[StatusEntry]) -> PhaseState {
    let mut state = PhaseState::default();
    for entry in log {
        if entry.message.starts_with(PROCESSING_CHUNKS_DONE) {
            state.chunking_done = true;
        }
        if state.candidates_found.is_none() {
            if let Some(caps) = candidates_found_re().captures(&entry.message) {
                state.candidates_found = caps[1].parse().ok();
            }
        }
        if entry.message == EXPANDING_CANDIDATES_DONE {
            state.expansion_done = true;
        }
    }
    state
}
