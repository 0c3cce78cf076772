//! Shared document types

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// One location where a clone appears
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneInstance {
    /// File the fragment was found in
    pub file_name: String,
    /// First line of the fragment (1-based)
    pub start_line: u32,
    /// Last line of the fragment (1-based)
    pub end_line: u32,
}

/// A confirmed clone: one duplicated fragment with all of its locations.
///
/// The first instance is the source location; the remaining instances are
/// the matching targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneDoc {
    /// Number of locations, kept denormalized alongside `instances`
    pub instance_count: u32,
    /// All locations of the fragment, source first
    pub instances: Vec<CloneInstance>,
    /// The duplicated fragment text, when the detector carried it through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
}

impl CloneDoc {
    /// Build a clone document from its locations
    pub fn new(instances: Vec<CloneInstance>) -> Self {
        Self {
            instance_count: instances.len() as u32,
            instances,
            contents: None,
        }
    }

    /// Attach the duplicated fragment text
    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    /// Source location (first instance), if any
    pub fn source(&self) -> Option<&CloneInstance> {
        self.instances.first()
    }

    /// Target locations (all instances after the source)
    pub fn targets(&self) -> &[CloneInstance] {
        if self.instances.is_empty() {
            &[]
        } else {
            &self.instances[1..]
        }
    }

    /// Line span of the source instance
    pub fn source_size(&self) -> u32 {
        self.source()
            .map(|i| i.end_line.saturating_sub(i.start_line))
            .unwrap_or(0)
    }
}

/// One entry of the append-only status log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    /// Wall-clock timestamp, milliseconds since the Unix epoch
    pub timestamp_ms: u64,
    /// Human-readable progress message
    pub message: String,
}

impl StatusEntry {
    /// Build an entry stamped with the current wall-clock time
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            timestamp_ms: now_ms(),
            message: message.into(),
        }
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Document-store connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store host
    pub host: String,
    /// Store port
    pub port: u16,
    /// Database name
    pub db_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 27017,
            db_name: "cloneDetector".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(file: &str, start: u32, end: u32) -> CloneInstance {
        CloneInstance {
            file_name: file.to_string(),
            start_line: start,
            end_line: end,
        }
    }

    #[test]
    fn test_clone_doc_source_and_targets() {
        let doc = CloneDoc::new(vec![
            instance("a.java", 10, 25),
            instance("b.java", 3, 18),
            instance("c.java", 40, 55),
        ]);
        assert_eq!(doc.instance_count, 3);
        assert_eq!(doc.source().unwrap().file_name, "a.java");
        assert_eq!(doc.targets().len(), 2);
        assert_eq!(doc.source_size(), 15);
    }

    #[test]
    fn test_clone_doc_carries_contents() {
        let doc = CloneDoc::new(vec![instance("a.java", 1, 5)]).with_contents("int a = 1;");
        assert_eq!(doc.contents.as_deref(), Some("int a = 1;"));
        assert!(CloneDoc::new(vec![]).contents.is_none());
    }

    #[test]
    fn test_empty_clone_doc() {
        let doc = CloneDoc::new(vec![]);
        assert!(doc.source().is_none());
        assert!(doc.targets().is_empty());
        assert_eq!(doc.source_size(), 0);
    }

    #[test]
    fn test_status_entry_serde() {
        let entry = StatusEntry {
            timestamp_ms: 1_700_000_000_000,
            message: "Summary".to_string(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: StatusEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_store_config_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 27017);
        assert_eq!(config.db_name, "cloneDetector");
    }
}
