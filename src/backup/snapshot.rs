use artcare_db::models::{FilterOption, Location, Senior, TeachingParticipant, TeachingRecord, Work};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RestoreError;

/// Format version written by this build.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Versions the restore engine accepts.
pub const SUPPORTED_VERSIONS: &[&str] = &[SNAPSHOT_VERSION];

/// Portable copy of the whole dataset.
///
/// Every field defaults when missing so that an incomplete file still parses
/// and is rejected by validation with a precise reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub data: SnapshotData,
    #[serde(default)]
    pub stats: SnapshotStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotData {
    #[serde(default)]
    pub works: Vec<Work>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub seniors: Vec<Senior>,
    #[serde(default)]
    pub teaching_records: Vec<TeachingRecord>,
    #[serde(default)]
    pub teaching_participants: Vec<TeachingParticipant>,
    #[serde(default)]
    pub filter_options: Vec<FilterOption>,
}

impl SnapshotData {
    /// Number of rows a restore would write.
    ///
    /// Built-in filter options are never stored, so they do not count.
    pub fn row_count(&self) -> usize {
        self.works.len()
            + self.locations.len()
            + self.seniors.len()
            + self.teaching_records.len()
            + self.teaching_participants.len()
            + self.stored_filter_options().count()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Filter options that are stored rows rather than built-in defaults.
    pub fn stored_filter_options(&self) -> impl Iterator<Item = &FilterOption> {
        self.filter_options.iter().filter(|o| !o.is_builtin())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotStats {
    #[serde(default)]
    pub works_count: usize,
    #[serde(default)]
    pub locations_count: usize,
    #[serde(default)]
    pub seniors_count: usize,
    #[serde(default)]
    pub records_count: usize,
}

impl SnapshotStats {
    pub fn of(data: &SnapshotData) -> Self {
        Self {
            works_count: data.works.len(),
            locations_count: data.locations.len(),
            seniors_count: data.seniors.len(),
            records_count: data.teaching_records.len(),
        }
    }
}

impl Snapshot {
    /// Wrap `data` with the current version, time and counts.
    pub fn new(data: SnapshotData) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            timestamp: Utc::now(),
            stats: SnapshotStats::of(&data),
            data,
        }
    }

    /// Parse a snapshot file.
    ///
    /// Malformed JSON is reported as [`RestoreError::InvalidSnapshot`].
    pub fn from_json(json: &str) -> Result<Self, RestoreError> {
        serde_json::from_str(json)
            .map_err(|e| RestoreError::InvalidSnapshot(format!("malformed snapshot: {e}")))
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn is_supported_version(&self) -> bool {
        SUPPORTED_VERSIONS.contains(&self.version.as_str())
    }
}
