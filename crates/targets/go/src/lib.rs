//! Go targets for Portal.
//!
//! - [`CgoWrapper`]: the cgo bridge exporting C entry points
//! - [`GoApi`]: Go types and interfaces for the API
//! - [`GoStubs`]: a panicking implementation skeleton

mod api;
mod cgo;
mod lang;
mod stubs;

pub use api::GoApi;
pub use cgo::{CgoBridge, CgoWrapper};
pub use lang::{CgoTypes, CgoValues, GoTypes, GoValues, c_field, method_header};
pub use stubs::GoStubs;

#[cfg(test)]
mod tests;
