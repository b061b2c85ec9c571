//! Item catalogs: a JSON array of names, or of objects with a `name` and
//! optional `description` and `tags`. Both forms may be mixed.

use std::path::Path;

use serde::Deserialize;
use sorting_core::Item;
use tracing::{debug, warn};

use crate::error::CliError;

const DEFAULT_CATALOG: &str = include_str!("../assets/default_catalog.json");

#[derive(Deserialize)]
#[serde(untagged)]
enum Entry {
    Name(String),
    Full(Item),
}

pub fn parse(json: &str) -> Result<Vec<Item>, CliError> {
    let entries: Vec<Entry> = serde_json::from_str(json)?;
    let total = entries.len();

    let items: Vec<Item> = entries
        .into_iter()
        .map(|entry| match entry {
            Entry::Name(name) => Item::new(name),
            Entry::Full(item) => item,
        })
        .filter(|item| !item.display_name().trim().is_empty())
        .collect();

    if items.len() < total {
        warn!(dropped = total - items.len(), "catalog entries with blank names ignored");
    }
    Ok(items)
}

pub fn load(path: &Path) -> Result<Vec<Item>, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::CatalogRead {
        path: path.to_path_buf(),
        source,
    })?;
    let items = parse(&json)?;
    debug!(path = %path.display(), items = items.len(), "catalog loaded");
    Ok(items)
}

/// The catalog bundled with the binary.
pub fn builtin() -> Result<Vec<Item>, CliError> {
    parse(DEFAULT_CATALOG)
}
