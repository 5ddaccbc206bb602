//! Work database queries.
//!
//! Deleting a work cascades to its teaching records and, through them, to
//! their participants.

use artcare_common::{Error, PhotoRef, Result, WorkId};
use chrono::Utc;
use rusqlite::Connection;

use super::{column_as, column_json, column_opt_as, db_err};
use crate::models::{normalize_materials, NewWork, Work};

const SELECT_COLUMNS: &str = "SELECT id, title, image_url, season, festival, materials, \
     description, created_at, updated_at FROM works";

fn parse_work_row(row: &rusqlite::Row) -> rusqlite::Result<Work> {
    Ok(Work {
        id: column_as(row, 0)?,
        title: row.get(1)?,
        image_ref: column_opt_as(row, 2)?,
        season: row.get(3)?,
        festival: row.get(4)?,
        materials: column_json(row, 5)?,
        description: row.get(6)?,
        created_at: column_as(row, 7)?,
        updated_at: column_as(row, 8)?,
    })
}

/// Create a new work. Material tags are de-duplicated, keeping their order.
pub fn create_work(conn: &Connection, new_work: &NewWork) -> Result<Work> {
    if new_work.title.trim().is_empty() {
        return Err(Error::invalid_input("work title must not be empty"));
    }

    let now = Utc::now();
    let work = Work {
        id: WorkId::new(),
        title: new_work.title.clone(),
        image_ref: new_work.image_ref.clone(),
        season: new_work.season.clone(),
        festival: new_work.festival.clone(),
        materials: normalize_materials(&new_work.materials),
        description: new_work.description.clone(),
        created_at: now,
        updated_at: now,
    };
    insert_work(conn, &work)?;
    Ok(work)
}

/// Insert a work, keeping its id and timestamps.
pub fn insert_work(conn: &Connection, work: &Work) -> Result<()> {
    let materials_json =
        serde_json::to_string(&work.materials).map_err(|e| Error::internal(e.to_string()))?;

    conn.execute(
        "INSERT INTO works (id, title, image_url, season, festival, materials, description,
                            created_at, updated_at)
         VALUES (:id, :title, :image_url, :season, :festival, :materials, :description,
                 :created_at, :updated_at)",
        rusqlite::named_params! {
            ":id": work.id.to_string(),
            ":title": &work.title,
            ":image_url": work.image_ref.as_ref().map(PhotoRef::as_str),
            ":season": &work.season,
            ":festival": &work.festival,
            ":materials": materials_json,
            ":description": &work.description,
            ":created_at": work.created_at.to_rfc3339(),
            ":updated_at": work.updated_at.to_rfc3339(),
        },
    )
    .map_err(db_err)?;

    Ok(())
}

/// Get a work by ID.
pub fn get_work(conn: &Connection, id: WorkId) -> Result<Option<Work>> {
    let result = conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = :id"),
        rusqlite::named_params! { ":id": id.to_string() },
        parse_work_row,
    );

    match result {
        Ok(work) => Ok(Some(work)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(db_err(e)),
    }
}

/// List all works, oldest first.
pub fn list_works(conn: &Connection) -> Result<Vec<Work>> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_COLUMNS} ORDER BY created_at, id"))
        .map_err(db_err)?;

    let works = stmt
        .query_map([], parse_work_row)
        .map_err(db_err)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(db_err)?;

    Ok(works)
}

/// Replace the main photo of a work.
///
/// # Returns
///
/// * `Ok(())` - If the update succeeded
/// * `Err(Error)` - If the work does not exist or a database error occurs
pub fn set_work_image(conn: &Connection, id: WorkId, image_ref: Option<&PhotoRef>) -> Result<()> {
    let rows_affected = conn
        .execute(
            "UPDATE works SET image_url = :image_url, updated_at = :updated_at WHERE id = :id",
            rusqlite::named_params! {
                ":id": id.to_string(),
                ":image_url": image_ref.map(PhotoRef::as_str),
                ":updated_at": Utc::now().to_rfc3339(),
            },
        )
        .map_err(db_err)?;

    if rows_affected == 0 {
        return Err(Error::not_found("work"));
    }

    Ok(())
}

/// Every non-null work photo reference.
pub fn list_image_refs(conn: &Connection) -> Result<Vec<PhotoRef>> {
    let mut stmt = conn
        .prepare("SELECT image_url FROM works WHERE image_url IS NOT NULL")
        .map_err(db_err)?;

    let refs = stmt
        .query_map([], |row| column_as(row, 0))
        .map_err(db_err)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(db_err)?;

    Ok(refs)
}

/// Delete a work (cascades to teaching records and participants).
pub fn delete_work(conn: &Connection, id: WorkId) -> Result<bool> {
    let rows_affected = conn
        .execute(
            "DELETE FROM works WHERE id = :id",
            rusqlite::named_params! { ":id": id.to_string() },
        )
        .map_err(db_err)?;

    Ok(rows_affected > 0)
}

/// Delete every work. Returns the number of rows removed.
pub fn delete_all_works(conn: &Connection) -> Result<usize> {
    conn.execute("DELETE FROM works", []).map_err(db_err)
}

/// Count works.
pub fn count_works(conn: &Connection) -> Result<usize> {
    conn.query_row("SELECT COUNT(*) FROM works", [], |row| row.get::<_, i64>(0))
        .map(|n| n as usize)
        .map_err(db_err)
}
