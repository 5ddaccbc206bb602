//! Whole-dataset backup and restore.
//!
//! A [`Snapshot`] holds every row of the six persisted collections plus a
//! version and summary counts. [`SnapshotExporter`] produces one;
//! [`RestoreEngine`] validates one and replaces the database contents with it.

mod export;
mod restore;
mod snapshot;

pub use export::{default_backup_file_name, SnapshotExporter};
pub use restore::{
    ParticipantFailure, RestoreEngine, RestoreError, RestoreProgress, RestoreResult, StepState,
};
pub use snapshot::{Snapshot, SnapshotData, SnapshotStats, SNAPSHOT_VERSION, SUPPORTED_VERSIONS};

use serde::Serialize;
use std::fmt;

/// One persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Locations,
    Seniors,
    Works,
    TeachingRecords,
    TeachingParticipants,
    FilterOptions,
}

impl Collection {
    /// Children before parents.
    pub const DELETE_ORDER: [Collection; 6] = [
        Self::TeachingParticipants,
        Self::TeachingRecords,
        Self::Seniors,
        Self::Works,
        Self::Locations,
        Self::FilterOptions,
    ];

    /// Parents before children.
    pub const INSERT_ORDER: [Collection; 6] = [
        Self::Locations,
        Self::Seniors,
        Self::Works,
        Self::TeachingRecords,
        Self::TeachingParticipants,
        Self::FilterOptions,
    ];

    /// Whether a failure while restoring this collection aborts the restore.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::TeachingParticipants)
    }

    /// Key of this collection in a snapshot's `data` object.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locations => "locations",
            Self::Seniors => "seniors",
            Self::Works => "works",
            Self::TeachingRecords => "teaching_records",
            Self::TeachingParticipants => "teaching_participants",
            Self::FilterOptions => "filter_options",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_respect_foreign_keys() {
        use Collection::*;
        let pos = |order: &[Collection; 6], c: Collection| order.iter().position(|x| *x == c).unwrap();

        let edges = [
            (TeachingParticipants, TeachingRecords),
            (TeachingParticipants, Seniors),
            (TeachingRecords, Works),
            (TeachingRecords, Locations),
            (Seniors, Locations),
        ];
        for (child, parent) in edges {
            assert!(pos(&Collection::DELETE_ORDER, child) < pos(&Collection::DELETE_ORDER, parent));
            assert!(pos(&Collection::INSERT_ORDER, parent) < pos(&Collection::INSERT_ORDER, child));
        }
    }

    #[test]
    fn test_only_participants_are_non_fatal() {
        let non_fatal: Vec<_> = Collection::INSERT_ORDER
            .into_iter()
            .filter(|c| !c.is_fatal())
            .collect();
        assert_eq!(non_fatal, vec![Collection::TeachingParticipants]);
    }
}
