//! Run statistics recorder

use crate::run::Run;
use crate::{PHASE_MATCH, PHASE_TOTAL};
use codestream_timer::TimerResult;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Four parallel series, appended in run-completion order.
///
/// Completion order is not submission order: concurrent runs finish out of
/// order, and that is the order the dashboards show.
#[derive(Debug, Default)]
struct StatsSeries {
    file_names: Vec<String>,
    total_ms: Vec<f64>,
    match_ms: Vec<f64>,
    line_counts: Vec<u64>,
}

/// Point-in-time copy of the statistics series for rendering
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    /// File names, completion order
    pub file_names: Vec<String>,
    /// Whole-run times in milliseconds
    pub total_ms: Vec<f64>,
    /// Match-detection times in milliseconds
    pub match_ms: Vec<f64>,
    /// Line counts per file
    pub line_counts: Vec<u64>,
}

/// Accumulates per-run metrics for the lifetime of the process.
///
/// The series is append-only and never trimmed or reordered; growth is
/// bounded only by process memory, an accepted tradeoff for this tool's
/// intended run length. All four vectors move together under one lock, so
/// they always have equal length no matter how many runs complete
/// concurrently.
pub struct RunStats {
    series: Mutex<StatsSeries>,
    last_timers: Mutex<Vec<(String, Duration)>>,
    processed: AtomicU64,
    summary_every: u64,
    dashboard_url: String,
}

impl RunStats {
    /// Create a recorder that logs a summary every `summary_every` files
    pub fn new(summary_every: u64, dashboard_url: impl Into<String>) -> Self {
        Self {
            series: Mutex::new(StatsSeries::default()),
            last_timers: Mutex::new(Vec::new()),
            processed: AtomicU64::new(0),
            summary_every: summary_every.max(1),
            dashboard_url: dashboard_url.into(),
        }
    }

    /// Record a completed run.
    ///
    /// Fails only on timer misuse (a run without completed `"total"` and
    /// `"match"` scopes), which indicates a pipeline sequencing bug.
    pub fn record(&self, run: &Run, clones_total: u64) -> TimerResult<()> {
        let total = run.timers.elapsed(PHASE_TOTAL)?;
        let matched = run.timers.elapsed(PHASE_MATCH)?;

        {
            let mut series = self.series.lock();
            series.file_names.push(run.name.clone());
            series.total_ms.push(total.as_secs_f64() * 1000.0);
            series.match_ms.push(matched.as_secs_f64() * 1000.0);
            series.line_counts.push(run.line_count as u64);
        }
        *self.last_timers.lock() = run.timers.completed();

        let processed = self.processed.fetch_add(1, Ordering::SeqCst) + 1;
        if processed % self.summary_every == 0 {
            self.log_summary(processed, clones_total);
        }
        Ok(())
    }

    fn log_summary(&self, processed: u64, clones_total: u64) {
        let timers = self
            .last_timers
            .lock()
            .iter()
            .map(|(name, elapsed)| format!("{}: {} µs", name, elapsed.as_micros()))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!(
            processed,
            clones = clones_total,
            "processed {} files and found {} clones",
            processed,
            clones_total
        );
        tracing::info!("timers for last file processed: {}", timers);
        tracing::info!("list of found clones available at {}", self.dashboard_url);
    }

    /// Number of runs recorded so far
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }

    /// Completed timers of the most recent run
    pub fn last_timers(&self) -> Vec<(String, Duration)> {
        self.last_timers.lock().clone()
    }

    /// Point-in-time copy of all four series.
    ///
    /// Renders read the copy, never the live series, so a page build cannot
    /// observe a half-appended entry while runs keep completing.
    pub fn snapshot(&self) -> StatsSnapshot {
        let series = self.series.lock();
        StatsSnapshot {
            file_names: series.file_names.clone(),
            total_ms: series.total_ms.clone(),
            match_ms: series.match_ms.clone(),
            line_counts: series.line_counts.clone(),
        }
    }
}
