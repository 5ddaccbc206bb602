//! Teaching record database queries.
//!
//! A record carries up to [`MAX_RECORD_PHOTOS`] field photos, stored as a
//! JSON array of reference strings in `photo_urls`.

use artcare_common::{Error, LocationId, PhotoRef, Result, TeachingRecordId, WorkId};
use chrono::Utc;
use rusqlite::Connection;

use super::{column_as, column_json, db_err};
use crate::models::{NewTeachingRecord, TeachingRecord, WorkStatistics, MAX_RECORD_PHOTOS};

const SELECT_COLUMNS: &str = "SELECT id, work_id, location_id, teaching_date, notes, photo_urls, \
     created_at FROM teaching_records";

fn parse_record_row(row: &rusqlite::Row) -> rusqlite::Result<TeachingRecord> {
    Ok(TeachingRecord {
        id: column_as(row, 0)?,
        work_id: column_as(row, 1)?,
        location_id: column_as(row, 2)?,
        teaching_date: column_as(row, 3)?,
        notes: row.get(4)?,
        photo_refs: column_json(row, 5)?,
        created_at: column_as(row, 6)?,
    })
}

fn check_photo_count(photo_refs: &[PhotoRef]) -> Result<()> {
    if photo_refs.len() > MAX_RECORD_PHOTOS {
        return Err(Error::invalid_input(format!(
            "a teaching record holds at most {} photos, got {}",
            MAX_RECORD_PHOTOS,
            photo_refs.len()
        )));
    }
    Ok(())
}

/// Create a teaching record for an existing work and location.
pub fn create_record(conn: &Connection, new_record: &NewTeachingRecord) -> Result<TeachingRecord> {
    let record = TeachingRecord {
        id: TeachingRecordId::new(),
        work_id: new_record.work_id,
        location_id: new_record.location_id,
        teaching_date: new_record.teaching_date,
        notes: new_record.notes.clone(),
        photo_refs: new_record.photo_refs.clone(),
        created_at: Utc::now(),
    };
    insert_record(conn, &record)?;
    Ok(record)
}

/// Insert a teaching record, keeping its id.
///
/// Fails if the work or location does not exist, or if the record carries
/// more than [`MAX_RECORD_PHOTOS`] photos.
pub fn insert_record(conn: &Connection, record: &TeachingRecord) -> Result<()> {
    check_photo_count(&record.photo_refs)?;

    let photos_json =
        serde_json::to_string(&record.photo_refs).map_err(|e| Error::internal(e.to_string()))?;

    conn.execute(
        "INSERT INTO teaching_records (id, work_id, location_id, teaching_date, notes,
                                       photo_urls, created_at)
         VALUES (:id, :work_id, :location_id, :teaching_date, :notes, :photo_urls, :created_at)",
        rusqlite::named_params! {
            ":id": record.id.to_string(),
            ":work_id": record.work_id.to_string(),
            ":location_id": record.location_id.to_string(),
            ":teaching_date": record.teaching_date.to_string(),
            ":notes": &record.notes,
            ":photo_urls": photos_json,
            ":created_at": record.created_at.to_rfc3339(),
        },
    )
    .map_err(db_err)?;

    Ok(())
}

/// Get a teaching record by ID.
pub fn get_record(conn: &Connection, id: TeachingRecordId) -> Result<Option<TeachingRecord>> {
    let result = conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = :id"),
        rusqlite::named_params! { ":id": id.to_string() },
        parse_record_row,
    );

    match result {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(db_err(e)),
    }
}

/// List all teaching records, oldest first.
pub fn list_records(conn: &Connection) -> Result<Vec<TeachingRecord>> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_COLUMNS} ORDER BY created_at, id"))
        .map_err(db_err)?;

    let records = stmt
        .query_map([], parse_record_row)
        .map_err(db_err)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(db_err)?;

    Ok(records)
}

/// List the teaching records of a work, most recent session first,
/// optionally restricted to one location.
pub fn list_records_for_work(
    conn: &Connection,
    work_id: WorkId,
    location_id: Option<LocationId>,
) -> Result<Vec<TeachingRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_COLUMNS}
             WHERE work_id = :work_id
               AND (:location_id IS NULL OR location_id = :location_id)
             ORDER BY teaching_date DESC, created_at DESC"
        ))
        .map_err(db_err)?;

    let records = stmt
        .query_map(
            rusqlite::named_params! {
                ":work_id": work_id.to_string(),
                ":location_id": location_id.map(|id| id.to_string()),
            },
            parse_record_row,
        )
        .map_err(db_err)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(db_err)?;

    Ok(records)
}

/// How many times a work has been taught and when it was last taught.
pub fn work_statistics(
    conn: &Connection,
    work_id: WorkId,
    location_id: Option<LocationId>,
) -> Result<WorkStatistics> {
    let records = list_records_for_work(conn, work_id, location_id)?;

    Ok(WorkStatistics {
        total_times: records.len(),
        last_taught: records.first().map(|r| r.teaching_date),
    })
}

/// Every field photo reference across all records.
pub fn list_photo_refs(conn: &Connection) -> Result<Vec<PhotoRef>> {
    let mut stmt = conn
        .prepare("SELECT photo_urls FROM teaching_records")
        .map_err(db_err)?;

    let per_record = stmt
        .query_map([], |row| column_json::<Vec<PhotoRef>>(row, 0))
        .map_err(db_err)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(db_err)?;

    Ok(per_record.into_iter().flatten().collect())
}

/// Delete a teaching record (cascades to its participants).
pub fn delete_record(conn: &Connection, id: TeachingRecordId) -> Result<bool> {
    let rows_affected = conn
        .execute(
            "DELETE FROM teaching_records WHERE id = :id",
            rusqlite::named_params! { ":id": id.to_string() },
        )
        .map_err(db_err)?;

    Ok(rows_affected > 0)
}

/// Delete every teaching record. Returns the number of rows removed.
pub fn delete_all_records(conn: &Connection) -> Result<usize> {
    conn.execute("DELETE FROM teaching_records", [])
        .map_err(db_err)
}

/// Count teaching records.
pub fn count_records(conn: &Connection) -> Result<usize> {
    conn.query_row("SELECT COUNT(*) FROM teaching_records", [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|n| n as usize)
    .map_err(db_err)
}
