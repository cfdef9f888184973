//! Bridging capability set.
//!
//! A [`Bridge`] supplies every target-specific emission primitive the generic
//! compiler needs: naming, handle-table access, parameter and result
//! conversion, and function assembly. The compiler never spells target
//! syntax itself.
//!
//! Handle and fold capabilities have defaults that fail with
//! [`BridgeError::MissingCapability`]; a target that cannot express them still
//! works for APIs that do not use them.

use rhizome_portal_ir::{FunctionType, TypeError, ValidationError, VarType};
use thiserror::Error;

/// Errors that can occur during bridge generation.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("target {target} is missing bridging capability: {capability}")]
    MissingCapability {
        target: &'static str,
        capability: &'static str,
    },

    #[error("fold interface {0} is used before any function returns it")]
    UnseededFold(String),

    #[error("failed to write output: {0}")]
    Fmt(#[from] std::fmt::Error),
}

impl BridgeError {
    pub fn missing(target: &'static str, capability: &'static str) -> Self {
        BridgeError::MissingCapability { target, capability }
    }
}

/// One exported boundary entry point, before target rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    /// Exported symbol name
    pub name: String,
    /// Boundary parameter declarations, in order
    pub params: Vec<String>,
    /// Boundary return type (empty for none)
    pub return_type: String,
    /// Body statements
    pub body: Vec<String>,
}

/// Target-specific emission primitives.
pub trait Bridge {
    /// Short target name used in diagnostics.
    fn target(&self) -> &'static str;

    /// Exported entry name for `iface.func`.
    fn entry_name(&self, iface: &str, func: &str) -> String;

    /// Name of the host method invoked for `func`.
    fn call_name(&self, func: &str) -> String;

    /// The process-wide instance of a singleton or plain interface.
    fn instance(&self, iface: &str) -> String;

    /// Declaration of a handle index parameter named `index`.
    fn handle_param(&self, index: &str) -> Result<String, BridgeError> {
        let _ = index;
        Err(BridgeError::missing(self.target(), "handle_param"))
    }

    /// Table lookup of an `iface` handle at `index`.
    fn handle_value(&self, iface: &str, index: &str) -> Result<String, BridgeError> {
        let _ = (iface, index);
        Err(BridgeError::missing(self.target(), "handle_value"))
    }

    /// Statement clearing the table slot addressed by `handle_value`.
    fn cleanup(&self, handle_value: &str) -> Result<String, BridgeError> {
        let _ = handle_value;
        Err(BridgeError::missing(self.target(), "cleanup"))
    }

    /// Receiver used by methods of a fold interface.
    fn fold_receiver(&self) -> Result<String, BridgeError> {
        Err(BridgeError::missing(self.target(), "fold_receiver"))
    }

    /// Statement binding the accumulated chain expression to the fold receiver.
    fn fold_prelude(&self, chain: &str) -> Result<String, BridgeError> {
        let _ = chain;
        Err(BridgeError::missing(self.target(), "fold_prelude"))
    }

    /// Boundary declarations for a declared parameter.
    fn param_in(&self, param: &VarType) -> Result<Vec<String>, BridgeError>;

    /// Host-side argument converted from a declared parameter.
    fn param_out(&self, param: &VarType) -> Result<String, BridgeError>;

    /// Host-side method call expression.
    fn call(&self, receiver: &str, func: &str, args: &[String]) -> String;

    /// Out-parameters reporting presence and error, appended after declared
    /// parameters.
    fn out_params(&self, func: &FunctionType) -> Vec<String>;

    /// Boundary return type of `func`. `new_handle` is set when the result is
    /// stored in a handle table and its index returned.
    fn return_type(&self, func: &FunctionType, new_handle: bool) -> Result<String, BridgeError>;

    /// Body appending the result of `call` to the `iface` table and returning
    /// its index.
    fn new_handle_body(&self, iface: &str, call: &str) -> Result<Vec<String>, BridgeError> {
        let _ = (iface, call);
        Err(BridgeError::missing(self.target(), "new_handle_body"))
    }

    /// Body invoking `call` once and reporting presence and error through the
    /// out-parameters.
    fn fallible_body(&self, func: &FunctionType, call: &str) -> Result<Vec<String>, BridgeError>;

    /// Body converting and returning the result of `call`.
    fn direct_body(&self, func: &FunctionType, call: &str) -> Result<Vec<String>, BridgeError>;

    /// Render an entry point as target source.
    fn render(&self, entry: &EntryPoint) -> String;
}
