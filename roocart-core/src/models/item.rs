//! Order-line descriptors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// Field carrying the menu identifier of an item.
pub const ITEM_ID_FIELD: &str = "menu_item_drn_id";

/// Identifier reported for items that have no [`ITEM_ID_FIELD`].
///
/// Such an item can never be confirmed by a basket snapshot.
pub const MISSING_ITEM_ID: &str = "1";

/// Reads a menu identifier, which arrives as a string or a number.
///
/// Empty strings and any other JSON type yield `None`.
pub fn menu_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// An opaque, provider-defined order line (menu identifier plus modifiers).
///
/// The descriptor is sent verbatim as the `item` variable of an add-item
/// request; only its identifier is interpreted locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Item {
    id: String,
    fields: Map<String, Value>,
}

impl Item {
    /// Creates an item from its JSON fields.
    pub fn new(fields: Map<String, Value>) -> Self {
        let id = fields
            .get(ITEM_ID_FIELD)
            .and_then(menu_id)
            .unwrap_or_else(|| MISSING_ITEM_ID.to_string());
        Self { id, fields }
    }

    /// Creates an item from an arbitrary JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Object(fields) => Ok(Self::new(fields)),
            other => Err(CoreError::InvalidItem(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// Returns the menu identifier used to confirm the item in a basket.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the raw descriptor fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for Item {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

impl From<Item> for Map<String, Value> {
    fn from(item: Item) -> Self {
        item.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_id() {
        let item = Item::from_value(json!({
            "menu_item_drn_id": "abc-123",
            "quantity": 1,
            "modifier_groups": []
        }))
        .unwrap();
        assert_eq!(item.id(), "abc-123");
    }

    #[test]
    fn test_missing_id_uses_sentinel() {
        let item = Item::from_value(json!({ "quantity": 2 })).unwrap();
        assert_eq!(item.id(), MISSING_ITEM_ID);
    }

    #[test]
    fn test_numeric_id_is_stringified() {
        let item = Item::from_value(json!({ "menu_item_drn_id": 98765, "quantity": 1 })).unwrap();
        assert_eq!(item.id(), "98765");
    }

    #[test]
    fn test_unusable_id_uses_sentinel() {
        for raw in [json!({ "menu_item_drn_id": "" }), json!({ "menu_item_drn_id": [1] })] {
            assert_eq!(Item::from_value(raw).unwrap().id(), MISSING_ITEM_ID);
        }
    }

    #[test]
    fn test_menu_id() {
        assert_eq!(menu_id(&json!("a-1")).as_deref(), Some("a-1"));
        assert_eq!(menu_id(&json!(42)).as_deref(), Some("42"));
        assert_eq!(menu_id(&json!(null)), None);
        assert_eq!(menu_id(&json!({ "id": 1 })), None);
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(Item::from_value(json!(["menu_item_drn_id"])).is_err());
        assert!(Item::from_value(json!("abc")).is_err());
    }

    #[test]
    fn test_serializes_transparently() {
        let raw = json!({ "menu_item_drn_id": "x", "quantity": 1 });
        let item = Item::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }
}
