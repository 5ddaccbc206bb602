//! Location database queries.
//!
//! Deleting a location cascades to its seniors and teaching records through
//! the schema's foreign keys.

use artcare_common::{LocationId, Result};
use chrono::Utc;
use rusqlite::Connection;

use super::{column_as, db_err};
use crate::models::Location;

const SELECT_COLUMNS: &str = "SELECT id, name, address, created_at FROM locations";

fn parse_location_row(row: &rusqlite::Row) -> rusqlite::Result<Location> {
    Ok(Location {
        id: column_as(row, 0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        created_at: column_as(row, 3)?,
    })
}

/// Create a new location.
pub fn create_location(conn: &Connection, name: &str, address: Option<&str>) -> Result<Location> {
    let location = Location {
        id: LocationId::new(),
        name: name.to_string(),
        address: address.map(str::to_string),
        created_at: Utc::now(),
    };
    insert_location(conn, &location)?;
    Ok(location)
}

/// Insert a location, keeping its id and timestamps.
pub fn insert_location(conn: &Connection, location: &Location) -> Result<()> {
    conn.execute(
        "INSERT INTO locations (id, name, address, created_at)
         VALUES (:id, :name, :address, :created_at)",
        rusqlite::named_params! {
            ":id": location.id.to_string(),
            ":name": &location.name,
            ":address": &location.address,
            ":created_at": location.created_at.to_rfc3339(),
        },
    )
    .map_err(db_err)?;

    Ok(())
}

/// Get a location by ID.
///
/// # Returns
///
/// * `Ok(Some(Location))` - The location if found
/// * `Ok(None)` - If the location does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_location(conn: &Connection, id: LocationId) -> Result<Option<Location>> {
    let result = conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = :id"),
        rusqlite::named_params! { ":id": id.to_string() },
        parse_location_row,
    );

    match result {
        Ok(location) => Ok(Some(location)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(db_err(e)),
    }
}

/// List all locations, oldest first.
pub fn list_locations(conn: &Connection) -> Result<Vec<Location>> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_COLUMNS} ORDER BY created_at, id"))
        .map_err(db_err)?;

    let locations = stmt
        .query_map([], parse_location_row)
        .map_err(db_err)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(db_err)?;

    Ok(locations)
}

/// Delete a location (cascades to seniors and teaching records).
///
/// # Returns
///
/// * `Ok(true)` - If the location was deleted
/// * `Ok(false)` - If the location did not exist
pub fn delete_location(conn: &Connection, id: LocationId) -> Result<bool> {
    let rows_affected = conn
        .execute(
            "DELETE FROM locations WHERE id = :id",
            rusqlite::named_params! { ":id": id.to_string() },
        )
        .map_err(db_err)?;

    Ok(rows_affected > 0)
}

/// Delete every location. Returns the number of rows removed.
pub fn delete_all_locations(conn: &Connection) -> Result<usize> {
    conn.execute("DELETE FROM locations", []).map_err(db_err)
}

/// Count locations.
pub fn count_locations(conn: &Connection) -> Result<usize> {
    conn.query_row("SELECT COUNT(*) FROM locations", [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|n| n as usize)
    .map_err(db_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::queries::seniors;

    #[test]
    fn test_create_and_get_location() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let created = create_location(&conn, "Sunrise Center", Some("12 Elm St")).unwrap();
        let found = get_location(&conn, created.id).unwrap().unwrap();

        assert_eq!(found, created);
    }

    #[test]
    fn test_get_location_not_found() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        assert!(get_location(&conn, LocationId::new()).unwrap().is_none());
    }

    #[test]
    fn test_insert_keeps_id() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let location = Location {
            id: LocationId::new(),
            name: "Harbor Center".to_string(),
            address: None,
            created_at: Utc::now(),
        };
        insert_location(&conn, &location).unwrap();

        let found = get_location(&conn, location.id).unwrap().unwrap();
        assert_eq!(found.id, location.id);
    }

    #[test]
    fn test_insert_duplicate_id_fails() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let location = create_location(&conn, "A", None).unwrap();
        assert!(insert_location(&conn, &location).is_err());
    }

    #[test]
    fn test_delete_location_cascades_to_seniors() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let location = create_location(&conn, "Sunrise Center", None).unwrap();
        seniors::create_senior(&conn, location.id, "Mrs. Lin", None).unwrap();
        seniors::create_senior(&conn, location.id, "Mr. Chen", None).unwrap();
        assert_eq!(seniors::count_seniors(&conn).unwrap(), 2);

        assert!(delete_location(&conn, location.id).unwrap());
        assert_eq!(seniors::count_seniors(&conn).unwrap(), 0);
        assert!(!delete_location(&conn, location.id).unwrap());
    }

    #[test]
    fn test_list_and_count() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        create_location(&conn, "A", None).unwrap();
        create_location(&conn, "B", None).unwrap();

        assert_eq!(list_locations(&conn).unwrap().len(), 2);
        assert_eq!(count_locations(&conn).unwrap(), 2);

        assert_eq!(delete_all_locations(&conn).unwrap(), 2);
        assert_eq!(count_locations(&conn).unwrap(), 0);
    }
}
