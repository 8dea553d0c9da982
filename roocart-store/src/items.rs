//! Loading the item list.

use std::path::Path;

use roocart_core::Item;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::StoreError;

/// Reads a JSON array of item objects.
///
/// Entries keep their order and every field is passed through untouched.
/// A non-object entry fails the whole load.
pub async fn load_items(path: &Path) -> Result<Vec<Item>, StoreError> {
    debug!(path = %path.display(), "Loading items file");

    let content = tokio::fs::read_to_string(path).await?;
    let items = parse_items(&content)?;

    info!(path = %path.display(), count = items.len(), "Loaded items");
    Ok(items)
}

/// Parses the content of an items file.
pub fn parse_items(content: &str) -> Result<Vec<Item>, StoreError> {
    let values: Vec<Value> = serde_json::from_str(content)?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            Item::from_value(value).map_err(|source| StoreError::Item { index, source })
        })
        .collect()
}
