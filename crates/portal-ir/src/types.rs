//! Type references.
//!
//! A type reference is the textual `type` carried by parameters, struct fields
//! and return types. It is one of:
//! - a primitive (`boolean`, `number`, `bigint`, `string`, `Uint8Array`, `void`)
//! - a custom type naming a struct, enum or interface (uppercase-leading)
//! - either of the above followed by `[]`
//!
//! Tuples (`[number,string]`) are rejected.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while parsing a type reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("Unknown type: {0}")]
    Unknown(String),

    #[error("Tuples not supported: {0}")]
    Tuple(String),
}

/// Closed set of primitive kinds every target must be able to spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Primitive {
    /// `boolean`
    Bool,
    /// `number` (64-bit float)
    Number,
    /// `bigint` (64-bit signed integer)
    BigInt,
    /// `string`
    String,
    /// `Uint8Array` (opaque byte buffer)
    Bytes,
    /// `void`
    Void,
}

impl Primitive {
    pub const ALL: [Primitive; 6] = [
        Primitive::Bool,
        Primitive::Number,
        Primitive::BigInt,
        Primitive::String,
        Primitive::Bytes,
        Primitive::Void,
    ];

    /// Look up a primitive by its IR spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(Primitive::Bool),
            "number" => Some(Primitive::Number),
            "bigint" => Some(Primitive::BigInt),
            "string" => Some(Primitive::String),
            "Uint8Array" => Some(Primitive::Bytes),
            "void" => Some(Primitive::Void),
            _ => None,
        }
    }

    /// The IR spelling of this primitive.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Bool => "boolean",
            Primitive::Number => "number",
            Primitive::BigInt => "bigint",
            Primitive::String => "string",
            Primitive::Bytes => "Uint8Array",
            Primitive::Void => "void",
        }
    }
}

/// Element type of a reference, with any array marker stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BaseType {
    Primitive(Primitive),
    Custom(String),
}

impl BaseType {
    pub fn custom_name(&self) -> Option<&str> {
        match self {
            BaseType::Custom(name) => Some(name),
            BaseType::Primitive(_) => None,
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseType::Primitive(p) => f.write_str(p.name()),
            BaseType::Custom(name) => f.write_str(name),
        }
    }
}

/// A parsed type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub base: BaseType,
    pub array: bool,
}

impl TypeRef {
    pub fn primitive(primitive: Primitive) -> Self {
        Self {
            base: BaseType::Primitive(primitive),
            array: false,
        }
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            base: BaseType::Custom(name.into()),
            array: false,
        }
    }

    pub fn array_of(self) -> Self {
        Self {
            array: true,
            ..self
        }
    }

    /// Parse a textual type reference.
    ///
    /// Only one trailing `[]` is stripped; the error messages carry the full
    /// reference as written.
    pub fn parse(ty: &str) -> Result<Self, TypeError> {
        let (base, array) = match ty.strip_suffix("[]") {
            Some(base) => (base, true),
            None => (ty, false),
        };

        if let Some(primitive) = Primitive::from_name(base) {
            return Ok(Self {
                base: BaseType::Primitive(primitive),
                array,
            });
        }

        if ty.starts_with('[') {
            return Err(TypeError::Tuple(ty.to_string()));
        }

        // Lowercase-leading names are reserved for primitives
        match base.chars().next() {
            Some(c) if c.is_uppercase() => Ok(Self {
                base: BaseType::Custom(base.to_string()),
                array,
            }),
            _ => Err(TypeError::Unknown(ty.to_string())),
        }
    }

    /// True for a plain (non-array) `void`.
    pub fn is_void(&self) -> bool {
        !self.array && self.base == BaseType::Primitive(Primitive::Void)
    }

    /// Name of the custom type this reference points at, if it is a plain
    /// (non-array) custom reference.
    pub fn custom_name(&self) -> Option<&str> {
        if self.array {
            None
        } else {
            self.base.custom_name()
        }
    }
}

impl FromStr for TypeRef {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if self.array {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primitives() {
        for primitive in Primitive::ALL {
            let parsed = TypeRef::parse(primitive.name()).unwrap();
            assert_eq!(parsed, TypeRef::primitive(primitive));
        }
    }

    #[test]
    fn test_parse_arrays() {
        assert_eq!(
            TypeRef::parse("string[]").unwrap(),
            TypeRef::primitive(Primitive::String).array_of()
        );
        assert_eq!(
            TypeRef::parse("StoreSource[]").unwrap(),
            TypeRef::custom("StoreSource").array_of()
        );
    }

    #[test]
    fn test_parse_custom() {
        let parsed = TypeRef::parse("Store").unwrap();
        assert_eq!(parsed.custom_name(), Some("Store"));
        assert!(!parsed.is_void());
    }

    #[test]
    fn test_unknown_type() {
        let err = TypeRef::parse("myunknown").unwrap_err();
        assert_eq!(err.to_string(), "Unknown type: myunknown");

        let err = TypeRef::parse("myunknown[]").unwrap_err();
        assert_eq!(err.to_string(), "Unknown type: myunknown[]");

        let err = TypeRef::parse("").unwrap_err();
        assert_eq!(err, TypeError::Unknown(String::new()));
    }

    #[test]
    fn test_tuple_type() {
        let err = TypeRef::parse("[number,string]").unwrap_err();
        assert_eq!(err.to_string(), "Tuples not supported: [number,string]");

        let err = TypeRef::parse("[number,string][]").unwrap_err();
        assert_eq!(err.to_string(), "Tuples not supported: [number,string][]");
    }

    #[test]
    fn test_void_array_is_not_void() {
        assert!(TypeRef::parse("void").unwrap().is_void());
        assert!(!TypeRef::parse("void[]").unwrap().is_void());
    }

    #[test]
    fn test_display_round_trips_text() {
        for text in ["boolean", "Uint8Array[]", "StoreCfg", "StoreSource[]"] {
            assert_eq!(TypeRef::parse(text).unwrap().to_string(), text);
        }
    }
}
