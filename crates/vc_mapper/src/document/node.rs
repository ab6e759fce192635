use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::document::{Number, OrderedMap};

/// A JSON-like object: string keys in insertion order.
pub type ObjectMap = OrderedMap<DocumentNode>;

// -----------------------------------------------------------------------------
// DocumentNode

/// The intermediate tree every value is written to and read from.
///
/// `Raw` carries verbatim text that a text writer emits without quoting or
/// escaping. Everywhere else it behaves like a string.
///
/// # Examples
///
/// ```
/// use vc_mapper::document::{DocumentNode, ObjectMap};
///
/// let mut object = ObjectMap::new();
/// object.insert("id", DocumentNode::from(7));
/// object.insert("tags", DocumentNode::from(vec![DocumentNode::from("a")]));
///
/// let node = DocumentNode::Object(object);
/// assert_eq!(node.get("id"), Some(&DocumentNode::from(7_u64)));
/// assert!(node.get("missing").is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DocumentNode {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Raw(String),
    Sequence(Vec<DocumentNode>),
    Object(ObjectMap),
}

/// The shape of a [`DocumentNode`], used in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Bool,
    Number,
    String,
    Raw,
    Sequence,
    Object,
}

impl NodeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            NodeKind::Null => "null",
            NodeKind::Bool => "boolean",
            NodeKind::Number => "number",
            NodeKind::String => "string",
            NodeKind::Raw => "raw value",
            NodeKind::Sequence => "sequence",
            NodeKind::Object => "object",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DocumentNode {
    /// An empty object node.
    #[inline]
    pub const fn object() -> Self {
        DocumentNode::Object(OrderedMap::new())
    }

    pub const fn kind(&self) -> NodeKind {
        match self {
            DocumentNode::Null => NodeKind::Null,
            DocumentNode::Bool(_) => NodeKind::Bool,
            DocumentNode::Number(_) => NodeKind::Number,
            DocumentNode::String(_) => NodeKind::String,
            DocumentNode::Raw(_) => NodeKind::Raw,
            DocumentNode::Sequence(_) => NodeKind::Sequence,
            DocumentNode::Object(_) => NodeKind::Object,
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, DocumentNode::Null)
    }

    /// Whether the node is an empty string, sequence or object.
    ///
    /// `Null` is not empty.
    pub fn is_empty_value(&self) -> bool {
        match self {
            DocumentNode::String(s) | DocumentNode::Raw(s) => s.is_empty(),
            DocumentNode::Sequence(items) => items.is_empty(),
            DocumentNode::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match *self {
            DocumentNode::Bool(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_number(&self) -> Option<&Number> {
        match self {
            DocumentNode::Number(n) => Some(n),
            _ => None,
        }
    }

    /// The text of a `String` or `Raw` node.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocumentNode::String(s) | DocumentNode::Raw(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_sequence(&self) -> Option<&[DocumentNode]> {
        match self {
            DocumentNode::Sequence(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_object(&self) -> Option<&ObjectMap> {
        match self {
            DocumentNode::Object(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object_mut(&mut self) -> Option<&mut ObjectMap> {
        match self {
            DocumentNode::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` when the node is an object.
    pub fn get(&self, key: &str) -> Option<&DocumentNode> {
        self.as_object()?.get(key)
    }

    /// A short description for error messages, e.g. `string "abc"`.
    pub fn describe(&self) -> String {
        const MAX: usize = 32;
        match self {
            DocumentNode::Null => String::from("null"),
            DocumentNode::Bool(b) => format!("boolean {b}"),
            DocumentNode::Number(n) => format!("number {n}"),
            DocumentNode::String(s) | DocumentNode::Raw(s) => {
                let kind = self.kind();
                match s.char_indices().nth(MAX) {
                    Some((cut, _)) => format!("{kind} {:?}...", &s[..cut]),
                    None => format!("{kind} {s:?}"),
                }
            }
            DocumentNode::Sequence(items) => format!("sequence of {} items", items.len()),
            DocumentNode::Object(map) => format!("object with {} keys", map.len()),
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

impl From<bool> for DocumentNode {
    #[inline]
    fn from(value: bool) -> Self {
        DocumentNode::Bool(value)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {$(
        impl From<$ty> for DocumentNode {
            #[inline]
            fn from(value: $ty) -> Self {
                DocumentNode::Number(Number::from(value))
            }
        }
    )*};
}

impl_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<Number> for DocumentNode {
    #[inline]
    fn from(value: Number) -> Self {
        DocumentNode::Number(value)
    }
}

impl From<&str> for DocumentNode {
    #[inline]
    fn from(value: &str) -> Self {
        DocumentNode::String(String::from(value))
    }
}

impl From<String> for DocumentNode {
    #[inline]
    fn from(value: String) -> Self {
        DocumentNode::String(value)
    }
}

impl From<Vec<DocumentNode>> for DocumentNode {
    #[inline]
    fn from(value: Vec<DocumentNode>) -> Self {
        DocumentNode::Sequence(value)
    }
}

impl From<ObjectMap> for DocumentNode {
    #[inline]
    fn from(value: ObjectMap) -> Self {
        DocumentNode::Object(value)
    }
}

impl<T: Into<DocumentNode>> From<Option<T>> for DocumentNode {
    fn from(value: Option<T>) -> Self {
        value.map_or(DocumentNode::Null, Into::into)
    }
}

/// Builds an object node from `key => value` pairs.
///
/// Values go through `DocumentNode::from`.
///
/// ```
/// use vc_mapper::{document::DocumentNode, object};
///
/// let node = object! { "code" => 2, "msg" => "ok" };
/// assert_eq!(node.get("msg"), Some(&DocumentNode::from("ok")));
/// ```
#[macro_export]
macro_rules! object {
    () => {
        $crate::document::DocumentNode::object()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::document::ObjectMap::new();
        $( map.insert($key, $crate::document::DocumentNode::from($value)); )+
        $crate::document::DocumentNode::Object(map)
    }};
}

#[cfg(test)]
mod tests {
    use super::DocumentNode;
    use crate::document::Number;

    #[test]
    fn empty_values() {
        assert!(DocumentNode::from("").is_empty_value());
        assert!(DocumentNode::Sequence(vec![]).is_empty_value());
        assert!(DocumentNode::object().is_empty_value());
        assert!(!DocumentNode::Null.is_empty_value());
        assert!(!DocumentNode::from(0).is_empty_value());
    }

    #[test]
    fn describe_truncates_long_text() {
        let long = "x".repeat(100);
        let text = DocumentNode::from(long.as_str()).describe();
        assert!(text.starts_with("string \"xxxx"));
        assert!(text.ends_with("..."));
        assert_eq!(DocumentNode::Number(Number::Int(4)).describe(), "number 4");
    }

    #[test]
    fn object_macro_keeps_order() {
        let node = object! { "b" => 1, "a" => true, "c" => Option::<i32>::None };
        let keys: Vec<_> = node.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["b", "a", "c"]);
        assert_eq!(node.get("c"), Some(&DocumentNode::Null));
    }
}
