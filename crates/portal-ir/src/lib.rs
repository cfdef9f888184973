//! API description IR for Portal.
//!
//! This crate defines the normalized description of an object-oriented API
//! surface consumed by every bridge target: interfaces and their methods,
//! plus the structs and enums they exchange.
//!
//! Type references stay textual in the IR (`"string"`, `"StoreSource[]"`)
//! and are parsed on demand into [`TypeRef`].

mod api;
mod types;
mod validation;
pub mod fixtures;

pub use api::{ApiType, FunctionType, InterfaceType, LoadError, StructType, VarType};
pub use types::{BaseType, Primitive, TypeError, TypeRef};
pub use validation::{validate, ValidationError};
