//! Configuration persistence using toml_edit to preserve formatting and comments.

use anyhow::{Context, Result};
use artcare_common::StorageMode;
use std::path::Path;
use toml_edit::{value, DocumentMut, Item, Table};

/// Update just `storage.mode`, leaving the rest of the file untouched.
///
/// A missing file is created with only the `[storage]` table.
pub fn update_storage_mode(path: &Path, mode: StorageMode) -> Result<()> {
    let mut doc: DocumentMut = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        content
            .parse()
            .with_context(|| format!("Failed to parse config file: {:?}", path))?
    } else {
        DocumentMut::new()
    };

    let storage = doc
        .entry("storage")
        .or_insert(Item::Table(Table::new()));
    let Some(storage) = storage.as_table_like_mut() else {
        anyhow::bail!("`storage` in {:?} is not a table", path);
    };
    storage.insert("mode", value(mode.to_string()));

    std::fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}
