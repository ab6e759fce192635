//! `serde` bridge for [`DocumentNode`].
//!
//! Any `serde` format can carry a document tree. Objects keep their key
//! order in both directions.
//!
//! `Raw` nodes are emitted verbatim through `serde_json`'s raw value when
//! the `json` feature is enabled. Without it they degrade to strings.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Formatter};

use serde_core::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_core::ser::{Serialize, SerializeMap, Serializer};

use crate::document::{DocumentNode, Number, ObjectMap};

// -----------------------------------------------------------------------------
// Serialize

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Number::Int(v) => serializer.serialize_i64(v),
            Number::UInt(v) => serializer.serialize_u64(v),
            Number::Float(v) => serializer.serialize_f64(v),
        }
    }
}

impl Serialize for DocumentNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DocumentNode::Null => serializer.serialize_unit(),
            DocumentNode::Bool(b) => serializer.serialize_bool(*b),
            DocumentNode::Number(n) => n.serialize(serializer),
            DocumentNode::String(s) => serializer.serialize_str(s),
            DocumentNode::Raw(text) => serialize_raw(text, serializer),
            DocumentNode::Sequence(items) => serializer.collect_seq(items),
            DocumentNode::Object(map) => {
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    state.serialize_entry(key, value)?;
                }
                state.end()
            }
        }
    }
}

#[cfg(feature = "json")]
fn serialize_raw<S: Serializer>(text: &str, serializer: S) -> Result<S::Ok, S::Error> {
    use serde_core::ser::Error;

    let raw = serde_json::value::RawValue::from_string(String::from(text))
        .map_err(|e| S::Error::custom(alloc::format!("invalid raw value: {e}")))?;
    raw.serialize(serializer)
}

#[cfg(not(feature = "json"))]
fn serialize_raw<S: Serializer>(text: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(text)
}

// -----------------------------------------------------------------------------
// Deserialize

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = DocumentNode;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("any document value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(DocumentNode::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(DocumentNode::Number(Number::Int(v)))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(DocumentNode::Number(Number::from_u64(v)))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
        Ok(DocumentNode::Number(Number::Float(v)))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(DocumentNode::String(String::from(v)))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
        Ok(DocumentNode::String(v))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(DocumentNode::Null)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(DocumentNode::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        DocumentNode::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or_default().min(1024));
        while let Some(item) = seq.next_element::<DocumentNode>()? {
            items.push(item);
        }
        Ok(DocumentNode::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut object = ObjectMap::with_capacity(map.size_hint().unwrap_or_default().min(256));
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value::<DocumentNode>()?;
            object.insert(key, value);
        }
        Ok(DocumentNode::Object(object))
    }
}

impl<'de> Deserialize<'de> for DocumentNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}
