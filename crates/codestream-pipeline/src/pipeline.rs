//! Staged pipeline execution

use crate::error::{PhaseError, PipelineResult};
use crate::run::Run;
use crate::stats::RunStats;
use codestream_store::{StoreReader, StoreWriter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Timer scope wrapping the whole run
pub const PHASE_TOTAL: &str = "total";
/// Timer scope wrapping match detection plus clone persistence
pub const PHASE_MATCH: &str = "match";

/// The opaque clone-detection seam.
///
/// Implementations carry the actual algorithms; the pipeline only sequences
/// them. Each phase takes the run by value and returns the transformed run,
/// or fails and aborts the remaining phases for that run.
pub trait Detector: Send + Sync {
    /// Remove uninteresting code, split the content into chunks
    fn preprocess(&self, run: Run) -> Result<Run, PhaseError>;

    /// Produce the intermediate representation compared during matching
    fn transform(&self, run: Run) -> Result<Run, PhaseError>;

    /// Compare chunks against previously seen code, producing clones
    fn match_detect(&self, run: Run) -> Result<Run, PhaseError>;
}

/// Sequences one run through the fixed phase order:
/// ingest, preprocess, transform, match-detect, persist-clones, persist-file.
///
/// The whole sequence runs inside a `"total"` timer scope; match-detect and
/// persist-clones share a nested `"match"` scope. On success the completed
/// run is handed to [`RunStats`] exactly once. A failure in any phase skips
/// everything after it, including the statistics append, so no partial run
/// is ever recorded.
pub struct Pipeline<D, S> {
    detector: D,
    store: Arc<S>,
    stats: Arc<RunStats>,
    next_id: AtomicU64,
}

impl<D, S> Pipeline<D, S>
where
    D: Detector,
    S: StoreReader + StoreWriter,
{
    /// Create a pipeline over a detector, a store, and a stats recorder
    pub fn new(detector: D, store: Arc<S>, stats: Arc<RunStats>) -> Self {
        Self {
            detector,
            store,
            stats,
            next_id: AtomicU64::new(0),
        }
    }

    /// The statistics recorder fed by this pipeline
    pub fn stats(&self) -> &Arc<RunStats> {
        &self.stats
    }

    /// Process one incoming file through all phases.
    ///
    /// Returns the completed run; callers decide how to surface failures
    /// (the ingest server logs them per run and keeps serving).
    pub fn process(&self, name: &str, content: String) -> PipelineResult<Run> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut run = Run::new(id, name, content);

        run.timers.start(PHASE_TOTAL);
        let run = self.detector.preprocess(run)?;
        let mut run = self.detector.transform(run)?;

        run.timers.start(PHASE_MATCH);
        let mut run = self.detector.match_detect(run)?;
        if run.candidate_count > 0 {
            self.store.add_candidates(run.candidate_count)?;
        }
        if !run.clones.is_empty() {
            self.store.add_clones(run.clones.clone())?;
        }
        run.timers.stop(PHASE_MATCH)?;

        if run.chunk_count > 0 {
            self.store.add_chunks(run.chunk_count)?;
        }
        self.store.add_file(&run.name)?;
        run.timers.stop(PHASE_TOTAL)?;

        // The run is fully persisted at this point; a failed read of the
        // clone total only degrades the periodic summary line.
        let clones_total = self.store.clones_count().unwrap_or_else(|e| {
            tracing::warn!("clone total unavailable for run summary: {}", e);
            0
        });
        self.stats.record(&run, clones_total)?;

        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codestream_store::{
        CloneDoc, CloneInstance, MemoryStore, StatusEntry, StoreError, StoreReader, StoreResult,
        StoreWriter,
    };

    /// Detector stub: one chunk per line, a clone when the content repeats a line
    struct StubDetector {
        fail_in: Option<&'static str>,
    }

    impl StubDetector {
        fn ok() -> Self {
            Self { fail_in: None }
        }

        fn failing(phase: &'static str) -> Self {
            Self {
                fail_in: Some(phase),
            }
        }

        fn check(&self, phase: &'static str) -> Result<(), PhaseError> {
            if self.fail_in == Some(phase) {
                Err(PhaseError::new(phase, "stub failure"))
            } else {
                Ok(())
            }
        }
    }

    impl Detector for StubDetector {
        fn preprocess(&self, mut run: Run) -> Result<Run, PhaseError> {
            self.check("preprocess")?;
            run.chunk_count = run.line_count as u64;
            Ok(run)
        }

        fn transform(&self, run: Run) -> Result<Run, PhaseError> {
            self.check("transform")?;
            Ok(run)
        }

        fn match_detect(&self, mut run: Run) -> Result<Run, PhaseError> {
            self.check("match-detect")?;
            run.candidate_count = 1;
            run.clones.push(CloneDoc::new(vec![CloneInstance {
                file_name: run.name.clone(),
                start_line: 1,
                end_line: 2,
            }]));
            Ok(run)
        }
    }

    fn pipeline(detector: StubDetector) -> Pipeline<StubDetector, MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        let stats = Arc::new(RunStats::new(100, "http://localhost:8080/"));
        Pipeline::new(detector, store, stats)
    }

    #[test]
    fn test_successful_run_records_stats_and_store() {
        let p = pipeline(StubDetector::ok());
        let run = p.process("a.java", "x\ny\nx".to_string()).unwrap();

        assert!(run.timers.is_complete(PHASE_TOTAL));
        assert!(run.timers.is_complete(PHASE_MATCH));
        assert!(
            run.timers.elapsed(PHASE_TOTAL).unwrap() >= run.timers.elapsed(PHASE_MATCH).unwrap()
        );

        assert_eq!(p.store.files_count().unwrap(), 1);
        assert_eq!(p.store.chunks_count().unwrap(), 3);
        assert_eq!(p.store.clones_count().unwrap(), 1);
        assert_eq!(p.stats.processed(), 1);
        assert_eq!(p.stats.snapshot().file_names, vec!["a.java".to_string()]);
    }

    #[test]
    fn test_phase_failure_records_nothing() {
        let p = pipeline(StubDetector::failing("transform"));
        let err = p.process("a.java", "x\ny".to_string()).unwrap_err();
        assert!(err.to_string().contains("transform"));

        assert_eq!(p.store.files_count().unwrap(), 0);
        assert_eq!(p.store.clones_count().unwrap(), 0);
        assert_eq!(p.stats.processed(), 0);
        assert_eq!(p.stats.snapshot().file_names.len(), 0);
    }

    #[test]
    fn test_match_failure_skips_persistence() {
        let p = pipeline(StubDetector::failing("match-detect"));
        assert!(p.process("a.java", "x".to_string()).is_err());
        assert_eq!(p.store.chunks_count().unwrap(), 0);
        assert_eq!(p.store.files_count().unwrap(), 0);
    }

    /// Writes succeed, the clone-total read does not
    struct CountlessStore {
        inner: MemoryStore,
    }

    impl StoreReader for CountlessStore {
        fn files_count(&self) -> StoreResult<u64> {
            self.inner.files_count()
        }
        fn file_names(&self) -> StoreResult<Vec<String>> {
            self.inner.file_names()
        }
        fn chunks_count(&self) -> StoreResult<u64> {
            self.inner.chunks_count()
        }
        fn candidates_count(&self) -> StoreResult<u64> {
            self.inner.candidates_count()
        }
        fn clones_count(&self) -> StoreResult<u64> {
            Err(StoreError::Unavailable("count read failed".to_string()))
        }
        fn clones(&self) -> StoreResult<Vec<CloneDoc>> {
            self.inner.clones()
        }
        fn status_log(&self) -> StoreResult<Vec<StatusEntry>> {
            self.inner.status_log()
        }
    }

    impl StoreWriter for CountlessStore {
        fn add_file(&self, name: &str) -> StoreResult<()> {
            self.inner.add_file(name)
        }
        fn add_chunks(&self, count: u64) -> StoreResult<()> {
            self.inner.add_chunks(count)
        }
        fn add_candidates(&self, count: u64) -> StoreResult<()> {
            self.inner.add_candidates(count)
        }
        fn add_clones(&self, clones: Vec<CloneDoc>) -> StoreResult<()> {
            self.inner.add_clones(clones)
        }
        fn push_status(&self, message: &str) -> StoreResult<()> {
            self.inner.push_status(message)
        }
    }

    #[test]
    fn test_clone_total_read_failure_does_not_fail_the_run() {
        let store = Arc::new(CountlessStore {
            inner: MemoryStore::new(),
        });
        let stats = Arc::new(RunStats::new(100, "http://localhost:8080/"));
        let p = Pipeline::new(StubDetector::ok(), store, stats);

        let run = p.process("a.java", "x\ny".to_string()).unwrap();
        assert!(run.timers.is_complete(PHASE_TOTAL));
        assert_eq!(p.store.inner.files_count().unwrap(), 1);
        assert_eq!(p.stats.processed(), 1);
    }

    #[test]
    fn test_same_content_twice_is_two_runs() {
        let p = pipeline(StubDetector::ok());
        let first = p.process("a.java", "x\ny".to_string()).unwrap();
        let second = p.process("a.java", "x\ny".to_string()).unwrap();

        assert_ne!(first.id, second.id);
        let snap = p.stats.snapshot();
        assert_eq!(snap.file_names.len(), 2);
        assert_eq!(snap.total_ms.len(), 2);
        assert_eq!(snap.match_ms.len(), 2);
        assert_eq!(snap.line_counts.len(), 2);
    }
}
