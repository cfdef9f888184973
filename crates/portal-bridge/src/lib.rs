//! Generic foreign-function bridge compiler for Portal.
//!
//! Boundary-crossing behavior (opaque object lifetime, optional and error
//! results, array marshalling, fluent call composition) is expressed once in
//! [`BridgeCompiler`] and replayed against any [`Bridge`] implementation.
//!
//! # Example
//!
//! ```ignore
//! let special = Special::from_api(&api);
//! let compiled = BridgeCompiler::new(&bridge, special).compile_api(&api)?;
//! ```

mod bridge;
mod compiler;
mod config;
pub mod mapping;
pub mod naming;
mod registry;
mod target;

pub use bridge::{Bridge, BridgeError, EntryPoint};
pub use compiler::{BridgeCompiler, Compiled, CompiledInterface, HANDLE_INDEX, Strategy};
pub use config::{ConfigError, TargetConfig};
pub use mapping::{TypeMapping, ValueMapping, map_type, map_type_ref, map_value, map_value_ref};
pub use registry::{FoldChains, FoldLink, Special};
pub use target::{Artifact, Target, file_name, package_dir, package_name};
