//! C target for Portal.
//!
//! Provides the C type table and struct/enum typedefs (shared with the cgo
//! preamble) and a prototype header back-end.

mod header;
mod types;

pub use header::{CBridge, CHeader};
pub use types::{CTypes, declarations, declare, enum_member, type_to_c};
