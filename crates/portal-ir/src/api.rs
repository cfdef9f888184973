//! API description types.
//!
//! The JSON form mirrors what the front end produces:
//!
//! ```json
//! {
//!   "interfaces": [{
//!     "name": "Stores", "singleton": true,
//!     "functions": [{ "name": "open", "params": [{ "name": "cfg", "type": "StoreCfg" }],
//!                     "returnType": "Store" }]
//!   }],
//!   "structs": [],
//!   "enums": []
//! }
//! ```

use crate::types::{TypeError, TypeRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading an API description.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read api description: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid api description: {0}")]
    Json(#[from] serde_json::Error),
}

/// A parameter, struct field or enum member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarType {
    pub name: String,
    /// Textual type reference (see [`TypeRef`])
    #[serde(rename = "type")]
    pub ty: String,
    /// Whether `ty` names an enum
    #[serde(rename = "enum", default)]
    pub is_enum: bool,
}

impl VarType {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            is_enum: false,
        }
    }

    pub fn type_ref(&self) -> Result<TypeRef, TypeError> {
        TypeRef::parse(&self.ty)
    }

    pub fn is_array(&self) -> bool {
        self.ty.ends_with("[]")
    }
}

/// An interface method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionType {
    pub name: String,
    #[serde(default)]
    pub params: Vec<VarType>,
    pub return_type: String,
    /// Result may be absent; reported through a presence flag
    #[serde(default)]
    pub return_optional: bool,
    /// Call may fail; reported through an error description
    #[serde(default)]
    pub throws: bool,
}

impl FunctionType {
    pub fn new(name: impl Into<String>, params: Vec<VarType>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params,
            return_type: return_type.into(),
            return_optional: false,
            throws: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.return_optional = true;
        self
    }

    pub fn throwing(mut self) -> Self {
        self.throws = true;
        self
    }

    pub fn return_ref(&self) -> Result<TypeRef, TypeError> {
        TypeRef::parse(&self.return_type)
    }
}

/// An interface and the identity/lifetime model of its instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceType {
    pub name: String,
    /// One process-wide instance, created at init
    #[serde(default)]
    pub singleton: bool,
    /// Instances cross the boundary as table indexes
    #[serde(default)]
    pub handle: bool,
    /// Methods are composed into the terminal call of a chain
    #[serde(default)]
    pub fold: bool,
    #[serde(default)]
    pub functions: Vec<FunctionType>,
}

impl InterfaceType {
    pub fn new(name: impl Into<String>, functions: Vec<FunctionType>) -> Self {
        Self {
            name: name.into(),
            singleton: false,
            handle: false,
            fold: false,
            functions,
        }
    }

    pub fn singleton(mut self) -> Self {
        self.singleton = true;
        self
    }

    pub fn handle(mut self) -> Self {
        self.handle = true;
        self
    }

    pub fn fold(mut self) -> Self {
        self.fold = true;
        self
    }
}

/// A data record, or an enum whose properties are its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructType {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<VarType>,
}

impl StructType {
    pub fn new(name: impl Into<String>, properties: Vec<VarType>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }
}

/// Complete API description for one generator run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiType {
    #[serde(default)]
    pub interfaces: Vec<InterfaceType>,
    #[serde(default)]
    pub structs: Vec<StructType>,
    #[serde(default)]
    pub enums: Vec<StructType>,
}

impl ApiType {
    /// Parse an API description and resolve enum references.
    pub fn from_json(source: &str) -> Result<Self, LoadError> {
        let mut api: ApiType = serde_json::from_str(source)?;
        api.resolve_enums();
        Ok(api)
    }

    /// Load an API description from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Mark every struct field and parameter whose base type names an enum.
    ///
    /// Enum names are collected first, so members may reference enums
    /// declared after them.
    pub fn resolve_enums(&mut self) {
        let names: BTreeSet<String> = self.enums.iter().map(|e| e.name.clone()).collect();
        let mark = |var: &mut VarType| {
            let base = var.ty.strip_suffix("[]").unwrap_or(&var.ty);
            var.is_enum = names.contains(base);
        };

        for s in &mut self.structs {
            s.properties.iter_mut().for_each(&mark);
        }
        for f in self.interfaces.iter_mut().flat_map(|i| i.functions.iter_mut()) {
            f.params.iter_mut().for_each(&mark);
        }
    }

    pub fn find_interface(&self, name: &str) -> Option<&InterfaceType> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    pub fn find_struct(&self, name: &str) -> Option<&StructType> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn singletons(&self) -> impl Iterator<Item = &InterfaceType> {
        self.interfaces.iter().filter(|i| i.singleton)
    }

    pub fn handles(&self) -> impl Iterator<Item = &InterfaceType> {
        self.interfaces.iter().filter(|i| i.handle)
    }
}
