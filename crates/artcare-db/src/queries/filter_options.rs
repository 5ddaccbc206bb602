//! Filter option database queries.
//!
//! Only user-defined options are stored. The built-in defaults are compiled
//! in, carry no id, and are merged in front of stored options when values
//! are listed for a category.

use artcare_common::{Error, FilterCategory, FilterOptionId, Result};
use rusqlite::Connection;

use super::{column_as, db_err};
use crate::models::{FilterOption, DEFAULT_DISPLAY_ORDER};

const BUILTIN_SEASONS: &[&str] = &["春", "夏", "秋", "冬", "不限"];
const BUILTIN_FESTIVALS: &[&str] = &[
    "無", "春節", "元宵節", "清明節", "端午節", "中秋節", "重陽節", "聖誕節",
];
const BUILTIN_MATERIALS: &[&str] = &["紙類", "黏土", "布料", "自然素材", "回收材料"];

const SELECT_COLUMNS: &str =
    "SELECT id, category, value, display_order, is_active FROM filter_options";

fn parse_option_row(row: &rusqlite::Row) -> rusqlite::Result<FilterOption> {
    Ok(FilterOption {
        id: Some(column_as(row, 0)?),
        category: column_as(row, 1)?,
        value: row.get(2)?,
        display_order: row.get(3)?,
        is_active: row.get(4)?,
    })
}

/// The built-in options of a category, in display order.
pub fn builtin_options(category: FilterCategory) -> Vec<FilterOption> {
    let values = match category {
        FilterCategory::Season => BUILTIN_SEASONS,
        FilterCategory::Festival => BUILTIN_FESTIVALS,
        FilterCategory::MaterialType => BUILTIN_MATERIALS,
    };

    values
        .iter()
        .enumerate()
        .map(|(order, value)| FilterOption {
            id: None,
            category,
            value: value.to_string(),
            display_order: order as i64,
            is_active: true,
        })
        .collect()
}

/// Create a user-defined option.
///
/// Values that duplicate a built-in option of the same category are
/// rejected; duplicates of stored options fail on the unique constraint.
pub fn create_filter_option(
    conn: &Connection,
    category: FilterCategory,
    value: &str,
    display_order: Option<i64>,
) -> Result<FilterOption> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::invalid_input("filter value must not be empty"));
    }
    if builtin_options(category).iter().any(|o| o.value == value) {
        return Err(Error::invalid_input(format!(
            "'{}' is already a built-in {} option",
            value, category
        )));
    }

    let option = FilterOption {
        id: Some(FilterOptionId::new()),
        category,
        value: value.to_string(),
        display_order: display_order.unwrap_or(DEFAULT_DISPLAY_ORDER),
        is_active: true,
    };
    insert_filter_option(conn, &option)?;
    Ok(option)
}

/// Insert a stored option, keeping its id.
///
/// Built-in options (no id) cannot be stored.
pub fn insert_filter_option(conn: &Connection, option: &FilterOption) -> Result<()> {
    let id = option
        .id
        .ok_or_else(|| Error::invalid_input("built-in filter options are not stored"))?;

    conn.execute(
        "INSERT INTO filter_options (id, category, value, display_order, is_active)
         VALUES (:id, :category, :value, :display_order, :is_active)",
        rusqlite::named_params! {
            ":id": id.to_string(),
            ":category": option.category.to_string(),
            ":value": &option.value,
            ":display_order": option.display_order,
            ":is_active": option.is_active,
        },
    )
    .map_err(db_err)?;

    Ok(())
}

/// List every stored option, active or not.
pub fn list_filter_options(conn: &Connection) -> Result<Vec<FilterOption>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_COLUMNS} ORDER BY category, display_order, id"
        ))
        .map_err(db_err)?;

    let options = stmt
        .query_map([], parse_option_row)
        .map_err(db_err)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(db_err)?;

    Ok(options)
}

/// The selectable values of a category: built-ins first, then active stored
/// options by display order.
pub fn list_values(conn: &Connection, category: FilterCategory) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT value FROM filter_options
             WHERE category = :category AND is_active = 1
             ORDER BY display_order, id",
        )
        .map_err(db_err)?;

    let stored = stmt
        .query_map(
            rusqlite::named_params! { ":category": category.to_string() },
            |row| row.get::<_, String>(0),
        )
        .map_err(db_err)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(db_err)?;

    let mut values: Vec<String> = builtin_options(category)
        .into_iter()
        .map(|o| o.value)
        .collect();
    values.extend(stored);
    Ok(values)
}

/// Delete a stored option.
///
/// Passing `None` (a built-in option) is refused.
pub fn delete_filter_option(conn: &Connection, id: Option<FilterOptionId>) -> Result<bool> {
    let id = id.ok_or_else(|| Error::invalid_input("built-in filter options cannot be deleted"))?;

    let rows_affected = conn
        .execute(
            "DELETE FROM filter_options WHERE id = :id",
            rusqlite::named_params! { ":id": id.to_string() },
        )
        .map_err(db_err)?;

    Ok(rows_affected > 0)
}

/// Delete every stored option. Returns the number of rows removed.
pub fn delete_all_filter_options(conn: &Connection) -> Result<usize> {
    conn.execute("DELETE FROM filter_options", [])
        .map_err(db_err)
}

/// Count stored options.
pub fn count_filter_options(conn: &Connection) -> Result<usize> {
    conn.query_row("SELECT COUNT(*) FROM filter_options", [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|n| n as usize)
    .map_err(db_err)
}
