//! JSON text for document trees, through `serde_json`.

use alloc::string::{String, ToString};

use crate::document::DocumentNode;
use crate::error::MapError;

/// Writes compact JSON text.
///
/// `Raw` nodes are spliced in verbatim.
///
/// ```
/// use vc_mapper::{document::{json, DocumentNode}, object};
///
/// let node = object! { "id" => 1, "body" => DocumentNode::Raw("{\"x\":true}".into()) };
/// assert_eq!(json::to_string(&node).unwrap(), r#"{"id":1,"body":{"x":true}}"#);
/// ```
pub fn to_string(node: &DocumentNode) -> Result<String, MapError> {
    serde_json::to_string(node).map_err(|e| MapError::Json(e.to_string()))
}

/// Writes indented JSON text.
pub fn to_string_pretty(node: &DocumentNode) -> Result<String, MapError> {
    serde_json::to_string_pretty(node).map_err(|e| MapError::Json(e.to_string()))
}

/// Parses JSON text, keeping the key order of every object.
///
/// ```
/// use vc_mapper::document::json;
///
/// let node = json::from_str(r#"{"z":1,"a":[true,null]}"#).unwrap();
/// let keys: Vec<_> = node.as_object().unwrap().keys().collect();
/// assert_eq!(keys, ["z", "a"]);
/// ```
pub fn from_str(text: &str) -> Result<DocumentNode, MapError> {
    serde_json::from_str(text).map_err(|e| MapError::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{from_str, to_string};
    use crate::document::{DocumentNode, Number};

    #[test]
    fn numbers_keep_their_shape() {
        let node = from_str("[1, -2, 2.5, 18446744073709551615]").unwrap();
        assert_eq!(
            node,
            DocumentNode::Sequence(vec![
                DocumentNode::Number(Number::Int(1)),
                DocumentNode::Number(Number::Int(-2)),
                DocumentNode::Number(Number::Float(2.5)),
                DocumentNode::Number(Number::UInt(u64::MAX)),
            ])
        );
    }

    #[test]
    fn text_round_trip_keeps_order() {
        let text = r#"{"b":{"y":1,"x":2},"a":"s"}"#;
        assert_eq!(to_string(&from_str(text).unwrap()).unwrap(), text);
    }

    #[test]
    fn invalid_raw_text_is_an_error() {
        assert!(to_string(&DocumentNode::Raw("{oops".into())).is_err());
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(matches!(from_str("{"), Err(crate::MapError::Json(_))));
    }
}
