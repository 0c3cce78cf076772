//! # codestream-store
//!
//! Store surface for CodeStream.
//!
//! The document store itself is an external collaborator; this crate
//! provides:
//! - Shared document types (clones, status-log entries)
//! - [`StoreReader`] / [`StoreWriter`] traits the pipeline and monitor
//!   program against
//! - An in-memory backend for single-process deployments and tests

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod memory;
mod traits;
mod types;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use traits::{StoreReader, StoreWriter};
pub use types::{now_ms, CloneDoc, CloneInstance, StatusEntry, StoreConfig};
