pub mod connection;
pub mod entities;
pub mod migrations;

#[cfg(test)]
pub mod test_utils;

use serde_json::{Map, Value};
use uuid::Uuid;

/// Fresh document id: a 32 character lowercase hex string.
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

// Document-shaped fields are stored as JSON text. Stored values are only ever
// written by these helpers, so decoding falls back to empty on corruption.

pub(crate) fn decode_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

pub(crate) fn encode_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn decode_map(raw: &str) -> Map<String, Value> {
    serde_json::from_str(raw).unwrap_or_default()
}

pub(crate) fn encode_map(values: &Map<String, Value>) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "{}".to_string())
}

/// Union of `values` into `target`, keeping first-seen order.
pub(crate) fn extend_unique(target: &mut Vec<String>, values: impl IntoIterator<Item = String>) {
    for value in values {
        if !target.contains(&value) {
            target.push(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_id_shape() {
        let id = new_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, new_id());
    }

    #[test]
    fn test_list_and_map_codecs_tolerate_garbage() {
        assert!(decode_list("not json").is_empty());
        assert!(decode_map("[1,2]").is_empty());

        let mut map = Map::new();
        map.insert("field".to_string(), json!(10));
        assert_eq!(decode_map(&encode_map(&map)), map);
    }

    #[test]
    fn test_extend_unique_keeps_order() {
        let mut values = vec!["a".to_string(), "b".to_string()];
        extend_unique(&mut values, vec!["b".to_string(), "c".to_string(), "a".to_string()]);
        assert_eq!(values, vec!["a", "b", "c"]);
    }
}
