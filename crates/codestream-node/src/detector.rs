//! Stand-in clone detector
//!
//! The production algorithms are an external collaborator behind the
//! [`Detector`] trait; this implementation keeps the binary runnable end to
//! end. It hashes fixed-size windows of normalized lines against an index
//! of everything seen so far and reports exact window matches as clones.

use codestream_pipeline::{Detector, PhaseError, Run};
use codestream_store::{CloneDoc, CloneInstance};
use parking_lot::RwLock;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Lines per comparison window
const WINDOW_LINES: usize = 5;

/// Exact-match windowed line-hash detector.
///
/// The chunk index is shared across runs for the lifetime of the process;
/// it grows with every file, the same accepted tradeoff as the statistics
/// series.
#[derive(Default)]
pub struct WindowDetector {
    index: RwLock<HashMap<u64, CloneInstance>>,
}

impl WindowDetector {
    /// Create a detector with an empty chunk index
    pub fn new() -> Self {
        Self::default()
    }

    fn window_hash(lines: &[&str]) -> u64 {
        let mut hasher = DefaultHasher::new();
        for line in lines {
            line.hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// Lines worth comparing: non-blank and not comment-only
fn interesting(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with("//") && !trimmed.starts_with('*')
}

impl Detector for WindowDetector {
    fn preprocess(&self, mut run: Run) -> Result<Run, PhaseError> {
        let kept = run.content.lines().filter(|l| interesting(l)).count();
        run.chunk_count = kept.saturating_sub(WINDOW_LINES - 1) as u64;
        Ok(run)
    }

    fn transform(&self, mut run: Run) -> Result<Run, PhaseError> {
        // Whitespace-insensitive representation; line numbering is restored
        // during match detection from the kept-line positions
        run.content = run
            .content
            .lines()
            .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(run)
    }

    fn match_detect(&self, mut run: Run) -> Result<Run, PhaseError> {
        // (original 1-based line number, normalized text)
        let lines: Vec<(u32, &str)> = run
            .content
            .lines()
            .enumerate()
            .filter(|(_, l)| interesting(l))
            .map(|(i, l)| (i as u32 + 1, l))
            .collect();

        let mut clones = Vec::new();
        let mut candidates = 0u64;
        let mut i = 0;
        while i + WINDOW_LINES <= lines.len() {
            let window = &lines[i..i + WINDOW_LINES];
            let text: Vec<&str> = window.iter().map(|(_, l)| *l).collect();
            let hash = Self::window_hash(&text);
            let here = CloneInstance {
                file_name: run.name.clone(),
                start_line: window[0].0,
                end_line: window[WINDOW_LINES - 1].0,
            };

            let seen = self.index.read().get(&hash).cloned();
            match seen {
                Some(target) if target != here => {
                    candidates += 1;
                    clones.push(CloneDoc::new(vec![here, target]).with_contents(text.join("\n")));
                    // Skip the rest of the matched window to avoid reporting
                    // the same fragment once per overlapping window
                    i += WINDOW_LINES;
                }
                Some(_) => {
                    i += 1;
                }
                None => {
                    self.index.write().entry(hash).or_insert(here);
                    i += 1;
                }
            }
        }

        run.candidate_count = candidates;
        run.clones = clones;
        Ok(run)
    }
}
