//! Generic per-function bridge compiler.
//!
//! Every function is classified into exactly one [`Strategy`] and compiled
//! into an [`EntryPoint`] through a [`Bridge`]. Functions returning a fold
//! interface produce no entry point; they extend the [`FoldChains`] that the
//! next step receives.

use crate::bridge::{Bridge, BridgeError, EntryPoint};
use crate::registry::{FoldChains, FoldLink, Special};
use rhizome_portal_ir::{ApiType, FunctionType, InterfaceType, validate};
use tracing::debug;

/// Name of the boundary parameter carrying a handle index.
pub const HANDLE_INDEX: &str = "handle";

/// How a function crosses the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Single handle parameter and `void` return; clears the slot afterwards.
    Closer,
    /// Result is a handle interface, stored in its table.
    NewHandle,
    /// Optional and/or throwing result, reported through out-parameters.
    Fallible,
    /// Result is converted and returned.
    Direct,
}

impl Strategy {
    pub fn classify(special: &Special, func: &FunctionType) -> Self {
        if is_closer(special, func) {
            Strategy::Closer
        } else if special.is_handle(&func.return_type) {
            Strategy::NewHandle
        } else if func.return_optional || func.throws {
            Strategy::Fallible
        } else {
            Strategy::Direct
        }
    }
}

fn is_closer(special: &Special, func: &FunctionType) -> bool {
    func.params.len() == 1 && special.is_handle(&func.params[0].ty) && func.return_type == "void"
}

/// Outcome of compiling one function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    /// Exported entry, absent for fold links
    pub entry: Option<EntryPoint>,
    /// Chains to thread into the next step
    pub chains: FoldChains,
}

/// Exported entries of one interface, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInterface {
    pub name: String,
    pub entries: Vec<EntryPoint>,
}

/// Replays the generic algorithm against one [`Bridge`].
pub struct BridgeCompiler<'a, B: Bridge + ?Sized> {
    bridge: &'a B,
    special: Special,
}

impl<'a, B: Bridge + ?Sized> BridgeCompiler<'a, B> {
    pub fn new(bridge: &'a B, special: Special) -> Self {
        Self { bridge, special }
    }

    /// Validate `api` and compile every interface in declaration order.
    pub fn compile_api(&self, api: &ApiType) -> Result<Vec<CompiledInterface>, BridgeError> {
        validate(api)?;

        let mut chains = FoldChains::new();
        let mut compiled = Vec::with_capacity(api.interfaces.len());
        for iface in &api.interfaces {
            let (entries, next) = self.compile_interface(chains, iface)?;
            chains = next;
            compiled.push(CompiledInterface {
                name: iface.name.clone(),
                entries,
            });
        }

        debug!(
            bridge = self.bridge.target(),
            interfaces = compiled.len(),
            chains = chains.len(),
            "compiled api"
        );
        Ok(compiled)
    }

    pub fn compile_interface(
        &self,
        mut chains: FoldChains,
        iface: &InterfaceType,
    ) -> Result<(Vec<EntryPoint>, FoldChains), BridgeError> {
        let mut entries = Vec::new();
        for func in &iface.functions {
            let compiled = self.compile(chains, iface, func)?;
            chains = compiled.chains;
            entries.extend(compiled.entry);
        }
        Ok((entries, chains))
    }

    /// Compile one function of `iface`.
    pub fn compile(
        &self,
        chains: FoldChains,
        iface: &InterfaceType,
        func: &FunctionType,
    ) -> Result<Compiled, BridgeError> {
        let bridge = self.bridge;
        let strategy = Strategy::classify(&self.special, func);
        let closer = strategy == Strategy::Closer;

        // Handle-backed owners and fold chains already declare `handle`.
        let closer_index = if closer && (iface.handle || iface.fold) {
            func.params[0].name.clone()
        } else {
            HANDLE_INDEX.to_string()
        };

        let (params_in, args) = if closer {
            let closed = bridge.handle_value(&func.params[0].ty, &closer_index)?;
            (vec![bridge.handle_param(&closer_index)?], vec![closed])
        } else {
            let mut params_in = Vec::new();
            let mut args = Vec::with_capacity(func.params.len());
            for param in &func.params {
                params_in.extend(bridge.param_in(param)?);
                args.push(bridge.param_out(param)?);
            }
            (params_in, args)
        };

        let handle_params = if iface.handle {
            vec![bridge.handle_param(HANDLE_INDEX)?]
        } else {
            Vec::new()
        };

        let chain = if iface.fold {
            Some(
                chains
                    .get(&iface.name)
                    .ok_or_else(|| BridgeError::UnseededFold(iface.name.clone()))?
                    .clone(),
            )
        } else {
            None
        };

        let call_name = bridge.call_name(&func.name);

        if self.special.is_fold(&func.return_type) {
            let head = match &chain {
                Some(link) => link.clone(),
                None => FoldLink {
                    params: handle_params,
                    expr: self.receiver(iface)?,
                },
            };
            let mut params = head.params;
            params.extend(params_in);
            let link = FoldLink {
                params,
                expr: bridge.call(&head.expr, &call_name, &args),
            };
            debug!(
                iface = %iface.name,
                func = %func.name,
                fold = %func.return_type,
                "extended fold chain"
            );
            return Ok(Compiled {
                entry: None,
                chains: chains.with(func.return_type.clone(), link),
            });
        }

        let receiver = self.receiver(iface)?;
        let call = bridge.call(&receiver, &call_name, &args);

        let mut body = Vec::new();
        let mut params = Vec::new();
        if let Some(link) = chain {
            body.push(bridge.fold_prelude(&link.expr)?);
            params.extend(link.params);
        }
        params.extend(handle_params);
        params.extend(params_in);

        // A closer still reports through out-parameters when it may fail.
        if strategy == Strategy::NewHandle {
            body.extend(bridge.new_handle_body(&func.return_type, &call)?);
        } else if func.return_optional || func.throws {
            params.extend(bridge.out_params(func));
            body.extend(bridge.fallible_body(func, &call)?);
        } else {
            body.extend(bridge.direct_body(func, &call)?);
        }

        if closer {
            let closed = bridge.handle_value(&func.params[0].ty, &closer_index)?;
            body.push(bridge.cleanup(&closed)?);
        }

        let entry = EntryPoint {
            name: bridge.entry_name(&iface.name, &func.name),
            params,
            return_type: bridge.return_type(func, strategy == Strategy::NewHandle)?,
            body,
        };
        debug!(entry = %entry.name, ?strategy, "compiled entry point");

        Ok(Compiled {
            entry: Some(entry),
            chains,
        })
    }

    fn receiver(&self, iface: &InterfaceType) -> Result<String, BridgeError> {
        if iface.handle {
            self.bridge.handle_value(&iface.name, HANDLE_INDEX)
        } else if iface.fold {
            self.bridge.fold_receiver()
        } else {
            Ok(self.bridge.instance(&iface.name))
        }
    }
}
