//! # codestream-timer
//!
//! Named, nestable phase timers attached to a unit of work.
//!
//! A [`TimerSet`] records monotonic start/stop timestamps per phase name.
//! Phases may nest (an outer `"total"` span covering an inner `"match"`
//! span) but names are unique per run. Pure bookkeeping, no I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::collections::HashMap;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Timer errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    /// Phase was stopped or read without ever being started
    #[error("phase {0:?} was never started")]
    NotStarted(String),

    /// Elapsed time requested for a phase that never stopped
    #[error("phase {0:?} was never stopped")]
    NotStopped(String),
}

/// Result type for timer operations
pub type TimerResult<T> = Result<T, TimerError>;

/// One phase span on a run
#[derive(Debug, Clone, Copy)]
struct PhaseSpan {
    started_at: Instant,
    stopped_at: Option<Instant>,
}

/// Named phase timers for one run.
///
/// Insertion order is preserved so completed phases render in the order
/// they were started.
#[derive(Debug, Default)]
pub struct TimerSet {
    spans: HashMap<String, PhaseSpan>,
    order: Vec<String>,
}

impl TimerSet {
    /// Create an empty timer set
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the named phase at the current monotonic time.
    ///
    /// Starting a phase that was already started overwrites the earlier
    /// start and clears any recorded stop.
    pub fn start(&mut self, phase: &str) {
        let span = PhaseSpan {
            started_at: Instant::now(),
            stopped_at: None,
        };
        if self.spans.insert(phase.to_string(), span).is_none() {
            self.order.push(phase.to_string());
        }
    }

    /// Stop the named phase at the current monotonic time.
    ///
    /// Returns [`TimerError::NotStarted`] if the phase was never started.
    pub fn stop(&mut self, phase: &str) -> TimerResult<()> {
        let span = self
            .spans
            .get_mut(phase)
            .ok_or_else(|| TimerError::NotStarted(phase.to_string()))?;
        span.stopped_at = Some(Instant::now());
        Ok(())
    }

    /// Elapsed time of a completed phase.
    ///
    /// Reading a phase that never stopped is an error, never a silent zero.
    pub fn elapsed(&self, phase: &str) -> TimerResult<Duration> {
        let span = self
            .spans
            .get(phase)
            .ok_or_else(|| TimerError::NotStarted(phase.to_string()))?;
        let stopped_at = span
            .stopped_at
            .ok_or_else(|| TimerError::NotStopped(phase.to_string()))?;
        Ok(stopped_at.duration_since(span.started_at))
    }

    /// Whether the named phase has both started and stopped
    pub fn is_complete(&self, phase: &str) -> bool {
        self.spans
            .get(phase)
            .map(|s| s.stopped_at.is_some())
            .unwrap_or(false)
    }

    /// Phase name and elapsed time for completed phases only, in start order
    pub fn completed(&self) -> Vec<(String, Duration)> {
        self.order
            .iter()
            .filter_map(|name| {
                let span = self.spans.get(name)?;
                let stopped_at = span.stopped_at?;
                Some((name.clone(), stopped_at.duration_since(span.started_at)))
            })
            .collect()
    }
}
