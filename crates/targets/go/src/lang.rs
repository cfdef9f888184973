//! Go and cgo mapping tables.
//!
//! Four tables: Go API types ([`GoTypes`]), cgo boundary types
//! ([`CgoTypes`]), and value conversion in each direction ([`GoValues`] for C
//! to Go, [`CgoValues`] for Go to C).

use rhizome_portal_bridge::naming::first_upper;
use rhizome_portal_bridge::{TypeMapping, ValueMapping, map_type, map_type_ref};
use rhizome_portal_ir::{BaseType, FunctionType, Primitive, TypeError, TypeRef};

/// Go API types, optionally qualified with the API package name.
pub struct GoTypes {
    pub qualifier: Option<&'static str>,
}

impl GoTypes {
    pub const LOCAL: GoTypes = GoTypes { qualifier: None };
    pub const API: GoTypes = GoTypes {
        qualifier: Some("api"),
    };
}

impl TypeMapping for GoTypes {
    fn primitive(&self, primitive: Primitive) -> &str {
        match primitive {
            Primitive::Bool => "bool",
            Primitive::Number => "float64",
            Primitive::BigInt => "int64",
            Primitive::String => "string",
            Primitive::Bytes => "[]byte",
            Primitive::Void => "",
        }
    }

    fn array_of(&self, element: &str) -> String {
        format!("[]{}", element)
    }

    fn custom(&self, name: &str) -> String {
        match self.qualifier {
            Some(pkg) => format!("{}.{}", pkg, name),
            None => name.to_string(),
        }
    }
}

/// cgo boundary types.
pub struct CgoTypes;

impl TypeMapping for CgoTypes {
    fn primitive(&self, primitive: Primitive) -> &str {
        match primitive {
            Primitive::Bool => "C.short",
            Primitive::Number => "C.double",
            Primitive::BigInt => "C.longlong",
            Primitive::String | Primitive::Bytes => "*C.char",
            Primitive::Void => "",
        }
    }

    fn array_of(&self, element: &str) -> String {
        format!("*{}", element)
    }

    fn custom(&self, name: &str) -> String {
        format!("C.{}", name)
    }
}

/// Converts C values to Go.
pub struct GoValues;

impl ValueMapping for GoValues {
    fn primitive(&self, primitive: Primitive, value: &str) -> String {
        match primitive {
            Primitive::Bool => format!("bool({} == 1)", value),
            Primitive::Number => format!("float64({})", value),
            Primitive::BigInt => format!("int64({})", value),
            Primitive::String => format!("C.GoString({})", value),
            Primitive::Bytes => format!(
                "C.GoBytes(unsafe.Pointer({0}), C.int(C.strlen({0})))",
                value
            ),
            Primitive::Void => value.to_string(),
        }
    }

    fn array_of(&self, element: &BaseType, value: &str) -> String {
        match element {
            BaseType::Primitive(Primitive::String) => {
                format!("GoStringSlice({0}, int({0}_length))", value)
            }
            BaseType::Custom(name) => format!("GoMapSlice({0}, int({0}_length), Go{1})", value, name),
            BaseType::Primitive(primitive) => format!(
                "GoMapSlice({0}, int({0}_length), func(e *{1}) {2} {{ return {3} }})",
                value,
                CgoTypes.primitive(*primitive),
                GoTypes::LOCAL.primitive(*primitive),
                self.primitive(*primitive, "*e")
            ),
        }
    }

    fn custom(&self, name: &str, value: &str) -> String {
        format!("Go{}(&{})", name, value)
    }
}

/// Converts Go values to C.
pub struct CgoValues;

impl ValueMapping for CgoValues {
    fn primitive(&self, primitive: Primitive, value: &str) -> String {
        match primitive {
            Primitive::Bool => format!("CBool({})", value),
            Primitive::Number => format!("C.double({})", value),
            Primitive::BigInt => format!("C.longlong({})", value),
            Primitive::String => format!("C.CString({})", value),
            Primitive::Bytes => format!("(*C.char)(C.CBytes({}))", value),
            Primitive::Void => value.to_string(),
        }
    }

    fn array_of(&self, element: &BaseType, value: &str) -> String {
        match element {
            BaseType::Primitive(Primitive::String) => format!("CStringSlice({})", value),
            BaseType::Custom(name) => format!("CMapSlice({}, C{})", value, name),
            BaseType::Primitive(primitive) => format!(
                "CMapSlice({}, func(e {}) {} {{ return {} }})",
                value,
                GoTypes::LOCAL.primitive(*primitive),
                CgoTypes.primitive(*primitive),
                self.primitive(*primitive, "e")
            ),
        }
    }

    fn custom(&self, name: &str, value: &str) -> String {
        format!("C{}({})", name, value)
    }
}

/// Go identifiers that cgo exposes with a leading underscore.
const KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

/// Name under which cgo exposes a C struct field.
pub fn c_field(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        format!("_{}", name)
    } else {
        name.to_string()
    }
}

/// Go method signature (`Open(cfg StoreCfg) Store`).
pub fn method_header(func: &FunctionType, types: &GoTypes) -> Result<String, TypeError> {
    let mut params = Vec::with_capacity(func.params.len());
    for param in &func.params {
        params.push(format!("{} {}", param.name, map_type(types, &param.ty)?));
    }

    let mut results = Vec::new();
    let ret = TypeRef::parse(&func.return_type)?;
    if !ret.is_void() {
        results.push(map_type_ref(types, &ret));
    }
    if func.return_optional {
        results.push("bool".to_string());
    }
    if func.throws {
        results.push("error".to_string());
    }

    let results = match results.len() {
        0 => String::new(),
        1 => format!(" {}", results[0]),
        _ => format!(" ({})", results.join(", ")),
    };

    Ok(format!("{}({}){}", first_upper(&func.name), params.join(", "), results))
}
