//! # codestream-monitor
//!
//! Derived-metrics polling engine for CodeStream.
//!
//! A [`Sampler`] polls the shared store on a fixed interval, classifies
//! pipeline-phase completion from the status log, and appends counter
//! samples to an in-memory [`SampleLog`]. The [`derive`] module turns raw
//! samples into deltas, rates, and windowed averages; everything there is a
//! pure function recomputed per render, never cached.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod derive;
mod phase;
mod sampler;
mod samples;

pub use phase::{classify, PhaseState, EXPANDING_CANDIDATES_DONE, PROCESSING_CHUNKS_DONE};
pub use sampler::{Sampler, DEFAULT_INTERVAL};
pub use samples::{Sample, SampleLog, SampleSnapshot};
