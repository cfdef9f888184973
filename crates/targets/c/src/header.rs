//! C prototype header back-end.
//!
//! Replays the bridge compiler with C spellings and keeps only the
//! signatures: bodies are produced but never rendered.

use crate::types::{declarations, declare, type_to_c};
use rhizome_portal_bridge::naming::{first_lower, first_upper};
use rhizome_portal_bridge::{
    Artifact, Bridge, BridgeCompiler, BridgeError, EntryPoint, Special, Target, TargetConfig,
    package_name,
};
use rhizome_portal_ir::{ApiType, FunctionType, VarType};
use tracing::info;

/// C capability set.
pub struct CBridge;

impl Bridge for CBridge {
    fn target(&self) -> &'static str {
        "c-header"
    }

    fn entry_name(&self, iface: &str, func: &str) -> String {
        format!("{}_{}", first_upper(iface), first_upper(func))
    }

    fn call_name(&self, func: &str) -> String {
        first_upper(func)
    }

    fn instance(&self, iface: &str) -> String {
        first_lower(iface)
    }

    fn handle_param(&self, index: &str) -> Result<String, BridgeError> {
        Ok(format!("longlong {}", index))
    }

    fn handle_value(&self, iface: &str, index: &str) -> Result<String, BridgeError> {
        Ok(format!("{}_handles[{}]", first_lower(iface), index))
    }

    fn cleanup(&self, handle_value: &str) -> Result<String, BridgeError> {
        Ok(format!("{} = NULL", handle_value))
    }

    fn fold_receiver(&self) -> Result<String, BridgeError> {
        Ok("folded".to_string())
    }

    fn fold_prelude(&self, chain: &str) -> Result<String, BridgeError> {
        Ok(format!("folded = {}", chain))
    }

    fn param_in(&self, param: &VarType) -> Result<Vec<String>, BridgeError> {
        Ok(declare(param)?)
    }

    fn param_out(&self, param: &VarType) -> Result<String, BridgeError> {
        Ok(param.name.clone())
    }

    fn call(&self, receiver: &str, func: &str, args: &[String]) -> String {
        format!("{}.{}({})", receiver, func, args.join(", "))
    }

    fn out_params(&self, func: &FunctionType) -> Vec<String> {
        let mut params = Vec::new();
        if func.return_optional {
            params.push("short* cok".to_string());
        }
        if func.throws {
            params.push("char** cerr".to_string());
        }
        params
    }

    fn return_type(&self, func: &FunctionType, new_handle: bool) -> Result<String, BridgeError> {
        if new_handle {
            return Ok("longlong".to_string());
        }
        let ty = type_to_c(&func.return_type)?;
        Ok(if ty.is_empty() { "void".to_string() } else { ty })
    }

    fn new_handle_body(&self, _iface: &str, _call: &str) -> Result<Vec<String>, BridgeError> {
        Ok(Vec::new())
    }

    fn fallible_body(&self, _func: &FunctionType, _call: &str) -> Result<Vec<String>, BridgeError> {
        Ok(Vec::new())
    }

    fn direct_body(&self, _func: &FunctionType, _call: &str) -> Result<Vec<String>, BridgeError> {
        Ok(Vec::new())
    }

    fn render(&self, entry: &EntryPoint) -> String {
        let params = if entry.params.is_empty() {
            "void".to_string()
        } else {
            entry.params.join(", ")
        };
        format!("{} {}({});", entry.return_type, entry.name, params)
    }
}

/// Emits `<clib_pkg>/main/clib.h`.
pub struct CHeader;

impl CHeader {
    pub fn render(&self, api: &ApiType, guard: &str) -> Result<String, BridgeError> {
        let compiled = BridgeCompiler::new(&CBridge, Special::from_api(api)).compile_api(api)?;

        let mut out = format!("#ifndef {0}\n#define {0}\n\n#include <stddef.h>\n\n", guard);
        out.push_str(&declarations(api)?);
        out.push_str("\nvoid InitLibrary(void);\n");

        for iface in compiled {
            if iface.entries.is_empty() {
                continue;
            }
            out.push_str(&format!("\n/* {} */\n", iface.name));
            for entry in &iface.entries {
                out.push_str(&CBridge.render(entry));
                out.push('\n');
            }
        }

        out.push_str(&format!("\n#endif /* {} */\n", guard));
        Ok(out)
    }
}

impl Target for CHeader {
    fn name(&self) -> &'static str {
        "c-header"
    }

    fn generate(&self, api: &ApiType, config: &TargetConfig) -> Result<Vec<Artifact>, BridgeError> {
        let name = "clib";
        let guard = format!("{}_H", name.to_uppercase());
        let content = self.render(api, &guard)?;
        let clib = config.clib_package();
        let artifact = Artifact::new(
            &format!("{}/main", clib),
            name,
            Some(package_name(&clib)),
            &config.file_prefixes,
            ".h",
            content,
        );

        info!(path = %artifact.path, "generated c header");
        Ok(vec![artifact])
    }
}
