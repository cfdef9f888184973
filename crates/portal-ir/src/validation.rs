//! API description validation.

use crate::api::{ApiType, InterfaceType, VarType};
use crate::types::{BaseType, Primitive, TypeError, TypeRef};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can occur during validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("duplicate {kind} name: {name}")]
    DuplicateName { kind: &'static str, name: String },

    #[error("{source} (at {owner})")]
    InvalidType {
        owner: String,
        #[source]
        source: TypeError,
    },

    #[error("{owner}: unresolved type reference: {name}")]
    UnresolvedType { owner: String, name: String },

    #[error("interface {0} must be at most one of singleton, handle, fold")]
    ConflictingModel(String),

    #[error("enum {owner}: member {member} must be backed by string or number, got {ty}")]
    InvalidEnumMember {
        owner: String,
        member: String,
        ty: String,
    },
}

/// Validate an API description before generation.
///
/// This checks:
/// - names are unique per category
/// - every type reference parses and every custom reference resolves
/// - each interface has at most one identity model
/// - enum members are string- or number-backed
pub fn validate(api: &ApiType) -> Result<(), ValidationError> {
    unique("interface", api.interfaces.iter().map(|i| i.name.as_str()))?;
    unique("struct", api.structs.iter().map(|s| s.name.as_str()))?;
    unique("enum", api.enums.iter().map(|e| e.name.as_str()))?;

    let known: BTreeSet<&str> = api
        .interfaces
        .iter()
        .map(|i| i.name.as_str())
        .chain(api.structs.iter().map(|s| s.name.as_str()))
        .chain(api.enums.iter().map(|e| e.name.as_str()))
        .collect();

    for e in &api.enums {
        for member in &e.properties {
            let backed = matches!(
                Primitive::from_name(&member.ty),
                Some(Primitive::String | Primitive::Number)
            );
            if !backed {
                return Err(ValidationError::InvalidEnumMember {
                    owner: e.name.clone(),
                    member: member.name.clone(),
                    ty: member.ty.clone(),
                });
            }
        }
    }

    for s in &api.structs {
        for prop in &s.properties {
            check_var(&known, &format!("{}.{}", s.name, prop.name), prop)?;
        }
    }

    for i in &api.interfaces {
        check_model(i)?;
        for f in &i.functions {
            let owner = format!("{}.{}", i.name, f.name);
            for param in &f.params {
                check_var(&known, &format!("{}({})", owner, param.name), param)?;
            }
            check_type(&known, &owner, &f.return_type)?;
        }
    }

    Ok(())
}

fn unique<'a>(kind: &'static str, names: impl Iterator<Item = &'a str>) -> Result<(), ValidationError> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ValidationError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn check_model(i: &InterfaceType) -> Result<(), ValidationError> {
    let models = [i.singleton, i.handle, i.fold].iter().filter(|m| **m).count();
    if models > 1 {
        return Err(ValidationError::ConflictingModel(i.name.clone()));
    }
    Ok(())
}

fn check_var(known: &BTreeSet<&str>, owner: &str, var: &VarType) -> Result<(), ValidationError> {
    check_type(known, owner, &var.ty)
}

fn check_type(known: &BTreeSet<&str>, owner: &str, ty: &str) -> Result<(), ValidationError> {
    let type_ref = TypeRef::parse(ty).map_err(|source| ValidationError::InvalidType {
        owner: owner.to_string(),
        source,
    })?;
    if let BaseType::Custom(name) = &type_ref.base {
        if !known.contains(name.as_str()) {
            return Err(ValidationError::UnresolvedType {
                owner: owner.to_string(),
                name: name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FunctionType, StructType};
    use crate::fixtures;

    #[test]
    fn test_validate_fixtures() {
        assert!(validate(&fixtures::command_handler_api()).is_ok());
        assert!(validate(&fixtures::stores_api()).is_ok());
    }

    #[test]
    fn test_duplicate_struct() {
        let api = ApiType {
            structs: vec![StructType::new("A", vec![]), StructType::new("A", vec![])],
            ..ApiType::default()
        };
        let err = validate(&api).unwrap_err();
        assert_eq!(err.to_string(), "duplicate struct name: A");
    }

    #[test]
    fn test_unresolved_reference() {
        let api = ApiType {
            interfaces: vec![InterfaceType::new(
                "Stores",
                vec![FunctionType::new("open", vec![], "Store")],
            )],
            ..ApiType::default()
        };
        let err = validate(&api).unwrap_err();
        assert!(matches!(err, ValidationError::UnresolvedType { ref name, .. } if name == "Store"));
    }

    #[test]
    fn test_unknown_primitive() {
        let api = ApiType {
            structs: vec![StructType::new("A", vec![VarType::new("x", "int")])],
            ..ApiType::default()
        };
        let err = validate(&api).unwrap_err();
        assert_eq!(err.to_string(), "Unknown type: int (at A.x)");
    }

    #[test]
    fn test_tuple_param() {
        let api = ApiType {
            interfaces: vec![InterfaceType::new(
                "Api",
                vec![FunctionType::new(
                    "pair",
                    vec![VarType::new("p", "[number,string]")],
                    "void",
                )],
            )],
            ..ApiType::default()
        };
        let err = validate(&api).unwrap_err();
        assert_eq!(err.to_string(), "Tuples not supported: [number,string] (at Api.pair(p))");
    }

    #[test]
    fn test_conflicting_model() {
        let api = ApiType {
            interfaces: vec![InterfaceType::new("Both", vec![]).handle().fold()],
            ..ApiType::default()
        };
        assert!(matches!(
            validate(&api),
            Err(ValidationError::ConflictingModel(name)) if name == "Both"
        ));
    }

    #[test]
    fn test_enum_member_kind() {
        let api = ApiType {
            enums: vec![StructType::new("Kind", vec![VarType::new("A", "boolean")])],
            ..ApiType::default()
        };
        assert!(matches!(
            validate(&api),
            Err(ValidationError::InvalidEnumMember { .. })
        ));
    }
}
