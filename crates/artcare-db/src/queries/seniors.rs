//! Senior database queries.

use artcare_common::{LocationId, Result, SeniorId};
use chrono::Utc;
use rusqlite::Connection;

use super::{column_as, db_err};
use crate::models::Senior;

const SELECT_COLUMNS: &str = "SELECT id, name, location_id, notes, created_at FROM seniors";

fn parse_senior_row(row: &rusqlite::Row) -> rusqlite::Result<Senior> {
    Ok(Senior {
        id: column_as(row, 0)?,
        name: row.get(1)?,
        location_id: column_as(row, 2)?,
        notes: row.get(3)?,
        created_at: column_as(row, 4)?,
    })
}

/// Create a senior attending `location_id`.
pub fn create_senior(
    conn: &Connection,
    location_id: LocationId,
    name: &str,
    notes: Option<&str>,
) -> Result<Senior> {
    let senior = Senior {
        id: SeniorId::new(),
        name: name.to_string(),
        location_id,
        notes: notes.map(str::to_string),
        created_at: Utc::now(),
    };
    insert_senior(conn, &senior)?;
    Ok(senior)
}

/// Insert a senior, keeping its id. Fails if the location does not exist.
pub fn insert_senior(conn: &Connection, senior: &Senior) -> Result<()> {
    conn.execute(
        "INSERT INTO seniors (id, name, location_id, notes, created_at)
         VALUES (:id, :name, :location_id, :notes, :created_at)",
        rusqlite::named_params! {
            ":id": senior.id.to_string(),
            ":name": &senior.name,
            ":location_id": senior.location_id.to_string(),
            ":notes": &senior.notes,
            ":created_at": senior.created_at.to_rfc3339(),
        },
    )
    .map_err(db_err)?;

    Ok(())
}

/// List all seniors, oldest first.
pub fn list_seniors(conn: &Connection) -> Result<Vec<Senior>> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_COLUMNS} ORDER BY created_at, id"))
        .map_err(db_err)?;

    let seniors = stmt
        .query_map([], parse_senior_row)
        .map_err(db_err)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(db_err)?;

    Ok(seniors)
}

/// List the seniors of one location, by name.
pub fn list_seniors_by_location(conn: &Connection, location_id: LocationId) -> Result<Vec<Senior>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE location_id = :location_id ORDER BY name, id"
        ))
        .map_err(db_err)?;

    let seniors = stmt
        .query_map(
            rusqlite::named_params! { ":location_id": location_id.to_string() },
            parse_senior_row,
        )
        .map_err(db_err)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(db_err)?;

    Ok(seniors)
}

/// Delete a senior (cascades to their participation rows).
pub fn delete_senior(conn: &Connection, id: SeniorId) -> Result<bool> {
    let rows_affected = conn
        .execute(
            "DELETE FROM seniors WHERE id = :id",
            rusqlite::named_params! { ":id": id.to_string() },
        )
        .map_err(db_err)?;

    Ok(rows_affected > 0)
}

/// Delete every senior. Returns the number of rows removed.
pub fn delete_all_seniors(conn: &Connection) -> Result<usize> {
    conn.execute("DELETE FROM seniors", []).map_err(db_err)
}

/// Count seniors.
pub fn count_seniors(conn: &Connection) -> Result<usize> {
    conn.query_row("SELECT COUNT(*) FROM seniors", [], |row| row.get::<_, i64>(0))
        .map(|n| n as usize)
        .map_err(db_err)
}
