//! Database query modules.
//!
//! One module per persisted collection:
//! - locations: Teaching locations
//! - seniors: Seniors attending a location
//! - works: Artworks and their main photo
//! - teaching_records: Teaching sessions and their field photos
//! - participants: Seniors' participation in a session
//! - filter_options: Tag values for works, including built-in defaults
//!
//! Besides everyday CRUD, every module exposes `insert_*` (keeps the given
//! id), `delete_all_*`, and `count_*`, which the backup engine uses.

pub mod filter_options;
pub mod locations;
pub mod participants;
pub mod seniors;
pub mod teaching_records;
pub mod works;

use std::error::Error as StdError;
use std::str::FromStr;

use rusqlite::types::Type;
use rusqlite::Row;
use serde::de::DeserializeOwned;

type BoxError = Box<dyn StdError + Send + Sync>;

fn conversion_error(idx: usize, err: impl Into<BoxError>) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, err.into())
}

/// Read a text column and parse it with `FromStr`.
pub(crate) fn column_as<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: Into<BoxError>,
{
    let text: String = row.get(idx)?;
    text.parse().map_err(|e| conversion_error(idx, e))
}

/// Read a nullable text column and parse it with `FromStr`.
pub(crate) fn column_opt_as<T>(row: &Row, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: Into<BoxError>,
{
    row.get::<_, Option<String>>(idx)?
        .map(|text| text.parse().map_err(|e| conversion_error(idx, e)))
        .transpose()
}

/// Read a text column holding JSON.
pub(crate) fn column_json<T: DeserializeOwned>(row: &Row, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text).map_err(|e| conversion_error(idx, e))
}

/// Map a rusqlite error into the common database error.
pub(crate) fn db_err(e: rusqlite::Error) -> artcare_common::Error {
    artcare_common::Error::database(e.to_string())
}
