//! Interval poller over the shared store

use crate::phase::classify;
use crate::samples::{Sample, SampleLog};
use codestream_store::{StoreReader, StoreResult};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// Default poll interval
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Polls store counters and the status log on a fixed interval.
///
/// Each tick re-derives phase state from the full status log (see
/// [`classify`](crate::classify)) and conditionally appends samples:
///
/// - chunk samples while `chunks > 0` and chunk processing has not finished
/// - paired candidate/clone samples while `clones > 0`, candidates have
///   been reported, and expansion has not finished
///
/// A failed store read logs a warning and skips the whole tick; no partial
/// snapshot is ever appended. Ticks run on a single task, so a slow store
/// delays the next tick instead of overlapping it.
pub struct Sampler<S> {
    store: Arc<S>,
    samples: Arc<SampleLog>,
    started: Instant,
}

impl<S: StoreReader> Sampler<S> {
    /// Create a sampler over a store, feeding the given sample log
    pub fn new(store: Arc<S>, samples: Arc<SampleLog>) -> Self {
        Self {
            store,
            samples,
            started: Instant::now(),
        }
    }

    /// Perform one poll tick; read failures are logged and skipped
    pub fn tick(&self) {
        if let Err(e) = self.try_tick() {
            tracing::warn!("store read failed, skipping sample tick: {}", e);
        }
    }

    fn try_tick(&self) -> StoreResult<()> {
        // Read everything before appending anything
        let chunks = self.store.chunks_count()?;
        let candidates = self.store.candidates_count()?;
        let clones = self.store.clones_count()?;
        let log = self.store.status_log()?;

        let state = classify(&log);
        let offset_ms = self.started.elapsed().as_millis() as u64;

        if chunks > 0 && !state.chunking_done {
            self.samples.push_chunks(Sample::new(offset_ms, chunks));
        }
        if clones > 0 && state.candidates_found.is_some() && !state.expansion_done {
            self.samples.push_expansion(
                Sample::new(offset_ms, candidates),
                Sample::new(offset_ms, clones),
            );
        }
        Ok(())
    }

    /// Poll forever at the given interval
    pub async fn run(self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick of tokio's interval fires immediately; skip it so the
        // first sample lands one interval after startup, like the original
        ticker.tick().await;
        loop {
            ticker.tick().await;
            self.tick();
        }
    }
}
