use alloc::string::{String, ToString};

use crate::document::{DocumentNode, Number};
use crate::error::MapError;
use crate::info::Presence;
use crate::mapper::{ReadContext, WriteContext};
use crate::value::MapValue;

// Numeric strings are accepted wherever a number is expected.

fn read_integral(node: &DocumentNode, label: &'static str) -> Result<i128, MapError> {
    let value = match node {
        DocumentNode::Number(n) => n.as_integral(),
        DocumentNode::String(s) => s.trim().parse::<i128>().ok(),
        _ => None,
    };
    value.ok_or_else(|| MapError::coercion(label, node))
}

fn read_float(node: &DocumentNode, label: &'static str) -> Result<f64, MapError> {
    let value = match node {
        DocumentNode::Number(n) => Some(n.as_f64()),
        DocumentNode::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.ok_or_else(|| MapError::coercion(label, node))
}

macro_rules! impl_integer {
    ($($ty:ident),*) => {$(
        impl MapValue for $ty {
            fn type_label() -> &'static str {
                stringify!($ty)
            }

            #[inline]
            fn to_node(&self, _ctx: &WriteContext<'_>) -> Result<DocumentNode, MapError> {
                Ok(DocumentNode::Number(Number::from(*self)))
            }

            fn from_node(node: &DocumentNode, _ctx: &ReadContext<'_>) -> Result<Self, MapError> {
                let wide = read_integral(node, stringify!($ty))?;
                $ty::try_from(wide).map_err(|_| MapError::coercion(stringify!($ty), node))
            }

            #[inline]
            fn default_value() -> Option<Self> {
                Some(0)
            }
        }
    )*};
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl MapValue for f64 {
    fn type_label() -> &'static str {
        "f64"
    }

    #[inline]
    fn to_node(&self, _ctx: &WriteContext<'_>) -> Result<DocumentNode, MapError> {
        Ok(DocumentNode::Number(Number::Float(*self)))
    }

    fn from_node(node: &DocumentNode, _ctx: &ReadContext<'_>) -> Result<Self, MapError> {
        read_float(node, "f64")
    }

    #[inline]
    fn default_value() -> Option<Self> {
        Some(0.0)
    }
}

impl MapValue for f32 {
    fn type_label() -> &'static str {
        "f32"
    }

    #[inline]
    fn to_node(&self, _ctx: &WriteContext<'_>) -> Result<DocumentNode, MapError> {
        Ok(DocumentNode::Number(Number::from(*self)))
    }

    fn from_node(node: &DocumentNode, _ctx: &ReadContext<'_>) -> Result<Self, MapError> {
        read_float(node, "f32").map(|v| v as f32)
    }

    #[inline]
    fn default_value() -> Option<Self> {
        Some(0.0)
    }
}

impl MapValue for bool {
    fn type_label() -> &'static str {
        "bool"
    }

    #[inline]
    fn to_node(&self, _ctx: &WriteContext<'_>) -> Result<DocumentNode, MapError> {
        Ok(DocumentNode::Bool(*self))
    }

    fn from_node(node: &DocumentNode, _ctx: &ReadContext<'_>) -> Result<Self, MapError> {
        match node {
            DocumentNode::Bool(b) => Ok(*b),
            DocumentNode::String(s) if s == "true" => Ok(true),
            DocumentNode::String(s) if s == "false" => Ok(false),
            _ => Err(MapError::coercion("bool", node)),
        }
    }

    #[inline]
    fn default_value() -> Option<Self> {
        Some(false)
    }
}

impl MapValue for char {
    fn type_label() -> &'static str {
        "char"
    }

    fn to_node(&self, _ctx: &WriteContext<'_>) -> Result<DocumentNode, MapError> {
        Ok(DocumentNode::String(self.to_string()))
    }

    fn from_node(node: &DocumentNode, _ctx: &ReadContext<'_>) -> Result<Self, MapError> {
        let mut chars = node.as_str().into_iter().flat_map(str::chars);
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(ch),
            _ => Err(MapError::coercion("char", node)),
        }
    }
}

impl MapValue for String {
    fn type_label() -> &'static str {
        "string"
    }

    fn to_node(&self, _ctx: &WriteContext<'_>) -> Result<DocumentNode, MapError> {
        Ok(DocumentNode::String(self.clone()))
    }

    fn from_node(node: &DocumentNode, _ctx: &ReadContext<'_>) -> Result<Self, MapError> {
        match node {
            DocumentNode::String(s) | DocumentNode::Raw(s) => Ok(s.clone()),
            DocumentNode::Number(n) => Ok(n.to_string()),
            DocumentNode::Bool(b) => Ok(b.to_string()),
            _ => Err(MapError::coercion("string", node)),
        }
    }

    #[inline]
    fn default_value() -> Option<Self> {
        Some(String::new())
    }
}

impl MapValue for DocumentNode {
    fn type_label() -> &'static str {
        "document node"
    }

    fn to_node(&self, _ctx: &WriteContext<'_>) -> Result<DocumentNode, MapError> {
        Ok(self.clone())
    }

    fn from_node(node: &DocumentNode, _ctx: &ReadContext<'_>) -> Result<Self, MapError> {
        Ok(node.clone())
    }

    fn presence(&self) -> Presence {
        if self.is_null() {
            Presence::Null
        } else {
            Presence::Present
        }
    }

    fn missing_value() -> Option<Self> {
        Some(DocumentNode::Null)
    }
}

#[cfg(test)]
mod tests {
    use crate::Mapper;
    use crate::document::DocumentNode;
    use crate::error::MapError;

    #[test]
    fn numeric_strings_coerce() {
        let mapper = Mapper::new();
        assert_eq!(mapper.read::<i32>(&DocumentNode::from(" 42 ")), Ok(42));
        assert_eq!(mapper.read::<f64>(&DocumentNode::from("2.5")), Ok(2.5));
        assert_eq!(mapper.read::<u8>(&DocumentNode::from(3.0)), Ok(3));
    }

    #[test]
    fn bad_numbers_fail() {
        let mapper = Mapper::new();
        let err = mapper.read::<i32>(&DocumentNode::from("abc")).unwrap_err();
        assert!(matches!(err, MapError::ValueCoercion { .. }));
        assert!(mapper.read::<u8>(&DocumentNode::from(300)).is_err());
        assert!(mapper.read::<i64>(&DocumentNode::from(1.5)).is_err());
    }

    #[test]
    fn null_into_scalar_fails() {
        let mapper = Mapper::new();
        let err = mapper.read::<bool>(&DocumentNode::Null).unwrap_err();
        assert_eq!(err.to_string(), "cannot read null as bool at $");
    }

    #[test]
    fn strings_accept_scalars() {
        let mapper = Mapper::new();
        assert_eq!(mapper.read::<String>(&DocumentNode::from(12)), Ok("12".into()));
        assert_eq!(mapper.read::<char>(&DocumentNode::from("x")), Ok('x'));
        assert!(mapper.read::<char>(&DocumentNode::from("xy")).is_err());
    }
}
