//! C type table and struct/enum declarations.

use rhizome_portal_bridge::{TypeMapping, map_type_ref};
use rhizome_portal_ir::{ApiType, Primitive, StructType, TypeError, TypeRef, VarType};
use std::collections::BTreeSet;

/// Primitive spellings for C.
pub struct CTypes;

impl TypeMapping for CTypes {
    fn primitive(&self, primitive: Primitive) -> &str {
        match primitive {
            Primitive::Bool => "short",
            Primitive::Number => "double",
            Primitive::BigInt => "longlong",
            Primitive::String | Primitive::Bytes => "char*",
            Primitive::Void => "",
        }
    }

    fn array_of(&self, element: &str) -> String {
        format!("{}*", element)
    }
}

/// C spelling of a textual type reference.
pub fn type_to_c(ty: &str) -> Result<String, TypeError> {
    Ok(map_type_ref(&CTypes, &TypeRef::parse(ty)?))
}

/// Declaration of a field or parameter. Arrays get a sibling length.
pub fn declare(var: &VarType) -> Result<Vec<String>, TypeError> {
    let mut decls = vec![format!("{} {}", type_to_c(&var.ty)?, var.name)];
    if var.is_array() {
        decls.push(format!("size_t {}_length", var.name));
    }
    Ok(decls)
}

/// C name of an enum member.
pub fn enum_member(e: &StructType, member: &VarType) -> String {
    format!("{}_{}", e.name, member.name)
}

/// Typedefs for every enum and struct, followed by struct definitions.
///
/// Structs are forward-declared so arrays may point at any struct; structs
/// embedded by value are defined before their users.
pub fn declarations(api: &ApiType) -> Result<String, TypeError> {
    let mut out = String::from("typedef long long longlong;\n");

    for e in &api.enums {
        let members: Vec<_> = e.properties.iter().map(|m| enum_member(e, m)).collect();
        out.push_str(&format!(
            "\ntypedef enum {} {{\n  {}\n}} {};\n",
            e.name,
            members.join(",\n  "),
            e.name
        ));
    }

    if !api.structs.is_empty() {
        out.push('\n');
    }
    for s in &api.structs {
        out.push_str(&format!("typedef struct {0} {0};\n", s.name));
    }

    let mut defined = BTreeSet::new();
    for s in &api.structs {
        define_struct(api, s, &mut defined, &mut out)?;
    }

    Ok(out)
}

fn define_struct<'a>(
    api: &'a ApiType,
    s: &'a StructType,
    defined: &mut BTreeSet<&'a str>,
    out: &mut String,
) -> Result<(), TypeError> {
    if !defined.insert(s.name.as_str()) {
        return Ok(());
    }

    // Only structs embedded by value must be complete first.
    for prop in &s.properties {
        let ty = prop.type_ref()?;
        if ty.array || prop.is_enum {
            continue;
        }
        if let Some(dep) = ty.custom_name().and_then(|name| api.find_struct(name)) {
            define_struct(api, dep, defined, out)?;
        }
    }

    let mut fields = Vec::new();
    for prop in &s.properties {
        fields.extend(declare(prop)?);
    }
    out.push_str(&format!("\nstruct {} {{\n", s.name));
    for field in fields {
        out.push_str(&format!("  {};\n", field));
    }
    out.push_str("};\n");
    Ok(())
}
