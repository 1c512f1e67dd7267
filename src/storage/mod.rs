//! Snapshot persistence.
//!
//! A snapshot is the full set of postings seen by the most recent run. It is
//! written as a metadata-wrapped object:
//!
//! ```text
//! {
//!   "last_updated": "2026-01-05T12:00:00Z",
//!   "total_count": 2,
//!   "internships": [ { "id": "...", "company": "...", ... }, ... ]
//! }
//! ```
//!
//! Older files hold a bare array of postings; both shapes load into the
//! same flat list.

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Posting;
use crate::utils::time::{self, lenient};

// Re-export for convenience
pub use local::LocalStorage;

/// Metadata-wrapped snapshot, the shape every save writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the snapshot was written
    #[serde(default = "time::epoch", deserialize_with = "lenient::deserialize")]
    pub last_updated: DateTime<Utc>,
    /// Number of postings, informational
    #[serde(default)]
    pub total_count: usize,
    /// The postings
    pub internships: Vec<Posting>,
}

impl Snapshot {
    pub fn new(internships: Vec<Posting>) -> Self {
        Self {
            last_updated: Utc::now(),
            total_count: internships.len(),
            internships,
        }
    }
}

/// Either accepted on-disk layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotFile {
    Wrapped(Snapshot),
    Bare(Vec<Posting>),
}

impl SnapshotFile {
    /// Collapse into a flat list of postings.
    pub fn into_postings(self) -> Vec<Posting> {
        match self {
            Self::Wrapped(snapshot) => snapshot.internships,
            Self::Bare(postings) => postings,
        }
    }

    /// Write timestamp, when the layout carries one.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Wrapped(snapshot) => Some(snapshot.last_updated),
            Self::Bare(_) => None,
        }
    }
}

/// Metadata about a snapshot write.
#[derive(Debug, Clone)]
pub struct SaveSummary {
    /// Number of postings written
    pub count: usize,
    /// Where the snapshot went
    pub location: String,
    /// Timestamp recorded in the snapshot
    pub timestamp: DateTime<Utc>,
}

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the previous postings; an absent snapshot is an empty list.
    async fn load(&self) -> Result<Vec<Posting>>;

    /// Replace the snapshot with `postings`.
    async fn save(&self, postings: &[Posting]) -> Result<SaveSummary>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_layout() {
        let json = r#"[{"id":"x","company":"Acme","role":"SWE","location":"NYC",
            "apply_url":"","date_posted":"Sep 01","found_at":"2025-09-01T00:00:00"}]"#;
        let file: SnapshotFile = serde_json::from_str(json).unwrap();
        assert!(file.last_updated().is_none());
        assert_eq!(file.into_postings()[0].company, "Acme");
    }

    #[test]
    fn test_wrapped_layout() {
        let json = r#"{"last_updated":"2025-09-02T08:00:00.5","total_count":1,
            "internships":[{"id":"x","company":"Acme","role":"SWE","location":"NYC",
            "apply_url":"","date_posted":"Sep 01","found_at":"2025-09-01T00:00:00Z"}]}"#;
        let file: SnapshotFile = serde_json::from_str(json).unwrap();
        assert!(matches!(file, SnapshotFile::Wrapped(_)));
        assert!(file.last_updated().is_some());
        assert_eq!(file.into_postings().len(), 1);
    }

    #[test]
    fn test_wrapped_without_metadata() {
        let file: SnapshotFile = serde_json::from_str(r#"{"internships":[]}"#).unwrap();
        assert!(matches!(file, SnapshotFile::Wrapped(_)));
    }

    #[test]
    fn test_unknown_shape_is_error() {
        assert!(serde_json::from_str::<SnapshotFile>(r#"{"notices":[]}"#).is_err());
        assert!(serde_json::from_str::<SnapshotFile>("42").is_err());
    }
}
