use std::path::Path;

use anyhow::Context;
use artcare_common::Result;
use artcare_db::pool::{get_conn, DbPool};
use artcare_db::queries::{filter_options, locations, participants, seniors, teaching_records, works};
use chrono::NaiveDate;
use tracing::info;

use super::{Snapshot, SnapshotData};

/// File name for a backup taken on `date`, e.g. `artcare-backup-2024-03-01.json`.
pub fn default_backup_file_name(date: NaiveDate) -> String {
    format!("artcare-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Reads the whole dataset into a [`Snapshot`].
#[derive(Clone)]
pub struct SnapshotExporter {
    pool: DbPool,
}

impl SnapshotExporter {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Read all six collections.
    ///
    /// Rows come back in a fixed order, so two exports of an unchanged
    /// database have identical `data`. Photo references are copied as stored.
    pub fn export_snapshot(&self) -> Result<Snapshot> {
        let conn = get_conn(&self.pool)?;

        let data = SnapshotData {
            works: works::list_works(&conn)?,
            locations: locations::list_locations(&conn)?,
            seniors: seniors::list_seniors(&conn)?,
            teaching_records: teaching_records::list_records(&conn)?,
            teaching_participants: participants::list_participants(&conn)?,
            filter_options: filter_options::list_filter_options(&conn)?,
        };

        let snapshot = Snapshot::new(data);
        info!(
            works = snapshot.stats.works_count,
            locations = snapshot.stats.locations_count,
            seniors = snapshot.stats.seniors_count,
            records = snapshot.stats.records_count,
            participants = snapshot.data.teaching_participants.len(),
            filter_options = snapshot.data.filter_options.len(),
            "Exported snapshot"
        );

        Ok(snapshot)
    }

    /// Export and write the snapshot as pretty-printed JSON to `path`.
    pub fn write_snapshot(&self, path: &Path) -> anyhow::Result<Snapshot> {
        let snapshot = self
            .export_snapshot()
            .context("Failed to read dataset for backup")?;
        let json = snapshot
            .to_json_pretty()
            .context("Failed to serialize snapshot")?;

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write backup file: {:?}", path))?;

        info!(path = %path.display(), "Backup written");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artcare_db::pool::init_memory_pool;

    #[test]
    fn test_default_backup_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(default_backup_file_name(date), "artcare-backup-2024-03-01.json");
    }

    #[test]
    fn test_export_empty_database() {
        let exporter = SnapshotExporter::new(init_memory_pool().unwrap());
        let snapshot = exporter.export_snapshot().unwrap();

        assert_eq!(snapshot.version, "1.0");
        assert!(snapshot.data.is_empty());
        assert_eq!(snapshot.stats.works_count, 0);
    }

    #[test]
    fn test_write_snapshot() {
        let pool = init_memory_pool().unwrap();
        {
            let conn = pool.get().unwrap();
            let location = locations::create_location(&conn, "Sunrise Center", None).unwrap();
            seniors::create_senior(&conn, location.id, "Mrs. Lin", None).unwrap();
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        let written = SnapshotExporter::new(pool).write_snapshot(&path).unwrap();

        let read_back = Snapshot::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read_back, written);
        assert_eq!(read_back.stats.locations_count, 1);
        assert_eq!(read_back.stats.seniors_count, 1);
    }
}
