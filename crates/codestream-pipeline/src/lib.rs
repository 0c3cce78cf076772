//! # codestream-pipeline
//!
//! Pipeline orchestration for CodeStream.
//!
//! This crate ties the per-file flow together:
//! - [`Run`]: one source file carried through the phases
//! - [`Pipeline`]: ordered phase execution wrapped in timer scopes
//! - [`RunStats`]: append-only per-run statistics with periodic summaries
//!
//! The clone-detection algorithms themselves live behind the [`Detector`]
//! trait and are supplied by the embedding application.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod pipeline;
mod run;
mod stats;

pub use error::{PhaseError, PipelineError, PipelineResult};
pub use pipeline::{Detector, Pipeline, PHASE_MATCH, PHASE_TOTAL};
pub use run::Run;
pub use stats::{RunStats, StatsSnapshot};
