//! Primitive type and value mapping tables.
//!
//! Each target supplies one table per direction. A table spells every
//! [`Primitive`] and provides two hooks: `array_of` for `T[]` and `custom` for
//! uppercase-leading struct/enum/interface names. The free functions here do
//! the parsing and dispatch, so an unknown or tuple-shaped reference fails the
//! same way on every target.

use rhizome_portal_ir::{BaseType, Primitive, TypeError, TypeRef};

/// Maps type references to a target's type syntax.
pub trait TypeMapping {
    /// Spelling of a primitive type.
    fn primitive(&self, primitive: Primitive) -> &str;

    /// Wrap an already mapped element type as an array.
    fn array_of(&self, element: &str) -> String;

    /// Spelling of a custom (struct, enum or interface) type.
    fn custom(&self, name: &str) -> String {
        name.to_string()
    }
}

/// Maps a value expression of a given type across the boundary.
pub trait ValueMapping {
    /// Convert a value of a primitive type.
    fn primitive(&self, primitive: Primitive, value: &str) -> String;

    /// Convert an array whose elements have type `element`.
    fn array_of(&self, element: &BaseType, value: &str) -> String;

    /// Convert a value of a custom type.
    fn custom(&self, name: &str, value: &str) -> String;
}

/// Map a textual type reference to target syntax.
pub fn map_type<M: TypeMapping + ?Sized>(mapping: &M, ty: &str) -> Result<String, TypeError> {
    Ok(map_type_ref(mapping, &TypeRef::parse(ty)?))
}

/// Map an already parsed type reference to target syntax.
pub fn map_type_ref<M: TypeMapping + ?Sized>(mapping: &M, ty: &TypeRef) -> String {
    let mapped = match &ty.base {
        BaseType::Primitive(primitive) => mapping.primitive(*primitive).to_string(),
        BaseType::Custom(name) => mapping.custom(name),
    };
    if ty.array {
        mapping.array_of(&mapped)
    } else {
        mapped
    }
}

/// Convert `value` of type `ty`, prepending `prefix` to the result.
///
/// A `void` value passes through without the prefix, so callers can pass
/// `"return "` and get a bare statement for calls that produce nothing.
pub fn map_value<M: ValueMapping + ?Sized>(
    mapping: &M,
    ty: &str,
    value: &str,
    prefix: &str,
) -> Result<String, TypeError> {
    Ok(map_value_ref(mapping, &TypeRef::parse(ty)?, value, prefix))
}

/// Parsed-reference variant of [`map_value`].
pub fn map_value_ref<M: ValueMapping + ?Sized>(
    mapping: &M,
    ty: &TypeRef,
    value: &str,
    prefix: &str,
) -> String {
    let converted = if ty.array {
        mapping.array_of(&ty.base, value)
    } else {
        match &ty.base {
            BaseType::Primitive(primitive) => mapping.primitive(*primitive, value),
            BaseType::Custom(name) => mapping.custom(name, value),
        }
    };

    if ty.is_void() {
        converted
    } else {
        format!("{}{}", prefix, converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Types;

    impl TypeMapping for Types {
        fn primitive(&self, primitive: Primitive) -> &str {
            match primitive {
                Primitive::Bool => "bool",
                Primitive::Number => "int",
                Primitive::BigInt => "long",
                Primitive::String => "str",
                Primitive::Bytes => "byte[]",
                Primitive::Void => "void",
            }
        }

        fn array_of(&self, element: &str) -> String {
            format!("{}[]", element)
        }
    }

    struct Values;

    impl ValueMapping for Values {
        fn primitive(&self, primitive: Primitive, value: &str) -> String {
            match primitive {
                Primitive::Void => value.to_string(),
                _ => format!("{}({})", Types.primitive(primitive), value),
            }
        }

        fn array_of(&self, element: &BaseType, value: &str) -> String {
            format!("{}[]({})", element, value)
        }

        fn custom(&self, name: &str, value: &str) -> String {
            format!("{}({})", name, value)
        }
    }

    #[test]
    fn test_map_primitive_types() {
        for primitive in Primitive::ALL {
            assert_eq!(
                map_type(&Types, primitive.name()).unwrap(),
                Types.primitive(primitive)
            );
        }
    }

    #[test]
    fn test_map_array_types() {
        for primitive in Primitive::ALL {
            let ty = format!("{}[]", primitive.name());
            assert_eq!(
                map_type(&Types, &ty).unwrap(),
                Types.array_of(&map_type(&Types, primitive.name()).unwrap())
            );
        }
        assert_eq!(map_type(&Types, "Custom[]").unwrap(), "Custom[]");
    }

    #[test]
    fn test_map_custom_type_defaults_to_name() {
        assert_eq!(map_type(&Types, "StoreCfg").unwrap(), "StoreCfg");
    }

    #[test]
    fn test_map_unknown_type() {
        let err = map_type(&Types, "unknown").unwrap_err();
        assert_eq!(err.to_string(), "Unknown type: unknown");
        let err = map_value(&Values, "unknown", "value", "prefix_").unwrap_err();
        assert_eq!(err.to_string(), "Unknown type: unknown");
    }

    #[test]
    fn test_map_tuple_type() {
        let err = map_type(&Types, "[number,string]").unwrap_err();
        assert_eq!(err.to_string(), "Tuples not supported: [number,string]");
    }

    #[test]
    fn test_map_values() {
        assert_eq!(
            map_value(&Values, "boolean", "true", "prefix_").unwrap(),
            "prefix_bool(true)"
        );
        assert_eq!(
            map_value(&Values, "number", "42", "prefix_").unwrap(),
            "prefix_int(42)"
        );
        assert_eq!(
            map_value(&Values, "Status", "s", "return ").unwrap(),
            "return Status(s)"
        );
    }

    #[test]
    fn test_map_array_values() {
        assert_eq!(
            map_value(&Values, "number[]", "xs", "prefix_").unwrap(),
            "prefix_number[](xs)"
        );
    }

    #[test]
    fn test_void_value_is_not_prefixed() {
        assert_eq!(
            map_value(&Values, "void", "obj.Close()", "return ").unwrap(),
            "obj.Close()"
        );
    }
}
