//! Destructive restore of a [`Snapshot`].
//!
//! A restore runs as a saga over the six collections. Validation happens
//! before anything is touched. Then every collection is cleared children
//! first and refilled parents first. Each collection is inserted in its own
//! transaction; there is no transaction spanning collections, so after a
//! fatal failure the [`RestoreProgress`] tells which collections hold the
//! snapshot's rows and which were left empty.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use artcare_common::ParticipantId;
use artcare_db::models::MAX_RECORD_PHOTOS;
use artcare_db::pool::{get_conn, DbPool};
use artcare_db::queries::{filter_options, locations, participants, seniors, teaching_records, works};
use rusqlite::Connection;
use serde::Serialize;
use tracing::{info, warn};

use super::{Collection, Snapshot, SUPPORTED_VERSIONS};

/// Where one collection stands in a restore run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum StepState {
    /// Not touched yet.
    Pending,
    /// Existing rows deleted, nothing inserted yet.
    Cleared,
    /// Rows from the snapshot inserted.
    Restored(usize),
    /// Inserting failed; the collection is empty.
    Failed(String),
}

/// Per-collection log of a restore run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreProgress {
    steps: Vec<(Collection, StepState)>,
}

impl RestoreProgress {
    fn new() -> Self {
        Self {
            steps: Collection::INSERT_ORDER
                .into_iter()
                .map(|c| (c, StepState::Pending))
                .collect(),
        }
    }

    fn set(&mut self, collection: Collection, state: StepState) {
        if let Some(step) = self.steps.iter_mut().find(|(c, _)| *c == collection) {
            step.1 = state;
        }
    }

    pub fn state(&self, collection: Collection) -> &StepState {
        self.steps
            .iter()
            .find(|(c, _)| *c == collection)
            .map(|(_, s)| s)
            .unwrap_or(&StepState::Pending)
    }

    pub fn steps(&self) -> &[(Collection, StepState)] {
        &self.steps
    }

    /// Collections that now hold the snapshot's rows.
    pub fn restored(&self) -> Vec<Collection> {
        self.steps
            .iter()
            .filter(|(_, s)| matches!(s, StepState::Restored(_)))
            .map(|(c, _)| *c)
            .collect()
    }
}

impl fmt::Display for RestoreProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (collection, state)) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match state {
                StepState::Pending => write!(f, "{collection}: untouched")?,
                StepState::Cleared => write!(f, "{collection}: emptied")?,
                StepState::Restored(n) => write!(f, "{collection}: restored {n}")?,
                StepState::Failed(_) => write!(f, "{collection}: failed, emptied")?,
            }
        }
        Ok(())
    }
}

/// A participant row that could not be restored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantFailure {
    pub id: ParticipantId,
    pub error: String,
}

/// Outcome of a successful restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreResult {
    pub locations: usize,
    pub seniors: usize,
    pub works: usize,
    pub records: usize,
    pub participants: usize,
    pub filters: usize,
    pub participant_failures: Vec<ParticipantFailure>,
    pub progress: RestoreProgress,
}

#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    /// The snapshot was rejected before any data was deleted.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// A collection failed to restore after deletion started.
    #[error(
        "Restoring {collection} failed: {source}. The dataset is only partially restored \
         ({progress}); restore again from the backup file before making changes"
    )]
    Fatal {
        collection: Collection,
        source: artcare_common::Error,
        progress: RestoreProgress,
    },

    /// The database could not be reached before the restore started.
    #[error(transparent)]
    Database(#[from] artcare_common::Error),
}

/// Check a snapshot against the rules a restore relies on.
///
/// Runs before any deletion, so a rejected snapshot leaves the database
/// untouched.
pub fn validate(snapshot: &Snapshot) -> Result<(), RestoreError> {
    if !snapshot.is_supported_version() {
        let found = if snapshot.version.is_empty() {
            "missing".to_string()
        } else {
            format!("'{}'", snapshot.version)
        };
        return Err(RestoreError::InvalidSnapshot(format!(
            "unsupported version {found}, expected one of {SUPPORTED_VERSIONS:?}"
        )));
    }

    let data = &snapshot.data;
    if data.is_empty() {
        return Err(RestoreError::InvalidSnapshot(
            "snapshot contains no data".to_string(),
        ));
    }

    let duplicate = |collection: Collection, id: String| {
        RestoreError::InvalidSnapshot(format!("{collection} contains id {id} more than once"))
    };
    if let Some(id) = first_duplicate(data.locations.iter().map(|l| l.id)) {
        return Err(duplicate(Collection::Locations, id.to_string()));
    }
    if let Some(id) = first_duplicate(data.seniors.iter().map(|s| s.id)) {
        return Err(duplicate(Collection::Seniors, id.to_string()));
    }
    if let Some(id) = first_duplicate(data.works.iter().map(|w| w.id)) {
        return Err(duplicate(Collection::Works, id.to_string()));
    }
    if let Some(id) = first_duplicate(data.teaching_records.iter().map(|r| r.id)) {
        return Err(duplicate(Collection::TeachingRecords, id.to_string()));
    }
    if let Some(id) = first_duplicate(data.teaching_participants.iter().map(|p| p.id)) {
        return Err(duplicate(Collection::TeachingParticipants, id.to_string()));
    }
    if let Some(id) = first_duplicate(data.stored_filter_options().filter_map(|o| o.id)) {
        return Err(duplicate(Collection::FilterOptions, id.to_string()));
    }
    if let Some((category, value)) =
        first_duplicate(data.stored_filter_options().map(|o| (o.category, o.value.as_str())))
    {
        return Err(RestoreError::InvalidSnapshot(format!(
            "filter option {category} '{value}' appears more than once"
        )));
    }

    let location_ids: HashSet<_> = data.locations.iter().map(|l| l.id).collect();
    let work_ids: HashSet<_> = data.works.iter().map(|w| w.id).collect();

    if let Some(senior) = data
        .seniors
        .iter()
        .find(|s| !location_ids.contains(&s.location_id))
    {
        return Err(RestoreError::InvalidSnapshot(format!(
            "senior {} references location {} which is not in the snapshot",
            senior.id, senior.location_id
        )));
    }

    for record in &data.teaching_records {
        if !work_ids.contains(&record.work_id) {
            return Err(RestoreError::InvalidSnapshot(format!(
                "teaching record {} references work {} which is not in the snapshot",
                record.id, record.work_id
            )));
        }
        if !location_ids.contains(&record.location_id) {
            return Err(RestoreError::InvalidSnapshot(format!(
                "teaching record {} references location {} which is not in the snapshot",
                record.id, record.location_id
            )));
        }
        if record.photo_refs.len() > MAX_RECORD_PHOTOS {
            return Err(RestoreError::InvalidSnapshot(format!(
                "teaching record {} has {} photos, at most {MAX_RECORD_PHOTOS} are allowed",
                record.id,
                record.photo_refs.len()
            )));
        }
    }

    Ok(())
}

fn first_duplicate<T: Eq + Hash>(items: impl IntoIterator<Item = T>) -> Option<T> {
    let mut seen = HashSet::new();
    for item in items {
        if seen.contains(&item) {
            return Some(item);
        }
        seen.insert(item);
    }
    None
}

/// Replaces the database contents with a snapshot.
#[derive(Clone)]
pub struct RestoreEngine {
    pool: DbPool,
}

impl RestoreEngine {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Validate `snapshot`, delete every collection, and insert the
    /// snapshot's rows keeping their ids.
    ///
    /// Participant rows that fail to insert are reported in
    /// [`RestoreResult::participant_failures`]; any other failure aborts with
    /// [`RestoreError::Fatal`].
    pub fn restore(&self, snapshot: &Snapshot) -> Result<RestoreResult, RestoreError> {
        validate(snapshot)?;

        let conn = get_conn(&self.pool)?;
        let mut progress = RestoreProgress::new();
        let data = &snapshot.data;

        info!(
            version = %snapshot.version,
            rows = data.row_count(),
            "Starting restore"
        );

        for collection in Collection::DELETE_ORDER {
            match clear(&conn, collection) {
                Ok(deleted) => {
                    info!(%collection, deleted, "Cleared collection");
                    progress.set(collection, StepState::Cleared);
                }
                Err(source) => return Err(fatal(collection, source, progress)),
            }
        }

        let mut result = RestoreResult {
            locations: 0,
            seniors: 0,
            works: 0,
            records: 0,
            participants: 0,
            filters: 0,
            participant_failures: Vec::new(),
            progress: RestoreProgress::new(),
        };

        for collection in Collection::INSERT_ORDER {
            let inserted = match collection {
                Collection::Locations => {
                    insert_all(&conn, &data.locations, locations::insert_location)
                }
                Collection::Seniors => insert_all(&conn, &data.seniors, seniors::insert_senior),
                Collection::Works => insert_all(&conn, &data.works, works::insert_work),
                Collection::TeachingRecords => {
                    insert_all(&conn, &data.teaching_records, teaching_records::insert_record)
                }
                Collection::TeachingParticipants => {
                    let (inserted, failures) = insert_participants(&conn, snapshot);
                    result.participant_failures = failures;
                    Ok(inserted)
                }
                Collection::FilterOptions => {
                    let stored: Vec<_> = data.stored_filter_options().cloned().collect();
                    insert_all(&conn, &stored, filter_options::insert_filter_option)
                }
            };

            let inserted = match inserted {
                Ok(n) => n,
                Err(source) => return Err(fatal(collection, source, progress)),
            };

            info!(%collection, inserted, "Restored collection");
            progress.set(collection, StepState::Restored(inserted));

            match collection {
                Collection::Locations => result.locations = inserted,
                Collection::Seniors => result.seniors = inserted,
                Collection::Works => result.works = inserted,
                Collection::TeachingRecords => result.records = inserted,
                Collection::TeachingParticipants => result.participants = inserted,
                Collection::FilterOptions => result.filters = inserted,
            }
        }

        result.progress = progress;

        info!(
            locations = result.locations,
            seniors = result.seniors,
            works = result.works,
            records = result.records,
            participants = result.participants,
            filters = result.filters,
            participant_failures = result.participant_failures.len(),
            "Restore complete"
        );

        Ok(result)
    }
}

fn fatal(
    collection: Collection,
    source: artcare_common::Error,
    mut progress: RestoreProgress,
) -> RestoreError {
    progress.set(collection, StepState::Failed(source.to_string()));
    warn!(%collection, error = %source, %progress, "Restore aborted");
    RestoreError::Fatal {
        collection,
        source,
        progress,
    }
}

fn clear(conn: &Connection, collection: Collection) -> artcare_common::Result<usize> {
    match collection {
        Collection::Locations => locations::delete_all_locations(conn),
        Collection::Seniors => seniors::delete_all_seniors(conn),
        Collection::Works => works::delete_all_works(conn),
        Collection::TeachingRecords => teaching_records::delete_all_records(conn),
        Collection::TeachingParticipants => participants::delete_all_participants(conn),
        Collection::FilterOptions => filter_options::delete_all_filter_options(conn),
    }
}

/// Insert every row or none.
fn insert_all<T>(
    conn: &Connection,
    rows: &[T],
    insert: fn(&Connection, &T) -> artcare_common::Result<()>,
) -> artcare_common::Result<usize> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| artcare_common::Error::database(e.to_string()))?;

    for row in rows {
        insert(&tx, row)?;
    }

    tx.commit()
        .map_err(|e| artcare_common::Error::database(e.to_string()))?;
    Ok(rows.len())
}

fn insert_participants(conn: &Connection, snapshot: &Snapshot) -> (usize, Vec<ParticipantFailure>) {
    let mut inserted = 0;
    let mut failures = Vec::new();

    for participant in &snapshot.data.teaching_participants {
        match participants::insert_participant(conn, participant) {
            Ok(()) => inserted += 1,
            Err(e) => {
                warn!(id = %participant.id, error = %e, "Skipping participant");
                failures.push(ParticipantFailure {
                    id: participant.id,
                    error: e.to_string(),
                });
            }
        }
    }

    (inserted, failures)
}
