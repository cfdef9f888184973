//! Go stub back-end.
//!
//! Emits a starting point for the implementation package the cgo wrapper
//! imports: one struct per interface with panicking methods, and the `Init`
//! type whose getters build every singleton.

use crate::lang::{GoTypes, method_header};
use rhizome_portal_bridge::{Artifact, BridgeError, Target, TargetConfig, package_name};
use rhizome_portal_ir::{ApiType, InterfaceType, validate};
use std::fmt::Write as FmtWrite;
use tracing::info;

/// Emits `<clib_pkg>/gen.go`.
pub struct GoStubs;

impl GoStubs {
    pub fn render(&self, api: &ApiType, config: &TargetConfig) -> Result<String, BridgeError> {
        validate(api)?;

        let clib = config.clib_package();
        let mut out = String::new();
        writeln!(out, "package {}\n", package_name(&clib))?;
        writeln!(out, "import api \"{}\"", config.import_path(&config.api_package()))?;

        writeln!(out, "\ntype Init struct {{\n}}")?;
        writeln!(out, "\nfunc NewInit() *Init {{\n\treturn &Init{{}}\n}}")?;
        for iface in api.singletons() {
            writeln!(out, "\nfunc (i *Init) {0}() api.{0} {{", iface.name)?;
            writeln!(out, "\treturn New{}()\n}}", iface.name)?;
        }

        for iface in &api.interfaces {
            write_stub(&mut out, iface)?;
        }
        Ok(out)
    }
}

impl Target for GoStubs {
    fn name(&self) -> &'static str {
        "go-stubs"
    }

    fn generate(&self, api: &ApiType, config: &TargetConfig) -> Result<Vec<Artifact>, BridgeError> {
        let clib = config.clib_package();
        let artifact = Artifact::new(
            &clib,
            "gen",
            Some(package_name(&clib)),
            &config.file_prefixes,
            ".go",
            self.render(api, config)?,
        );

        info!(path = %artifact.path, "generated go stubs");
        Ok(vec![artifact])
    }
}

fn write_stub(out: &mut String, iface: &InterfaceType) -> Result<(), BridgeError> {
    writeln!(out, "\n//=== {} ===", iface.name)?;
    writeln!(out, "\ntype {} struct {{\n}}", iface.name)?;
    writeln!(out, "\nfunc New{0}() *{0} {{\n\treturn &{0}{{}}\n}}", iface.name)?;

    for func in &iface.functions {
        writeln!(out, "\nfunc (s *{}) {} {{", iface.name, method_header(func, &GoTypes::API)?)?;
        writeln!(out, "\tpanic(\"not implemented yet\")\n}}")?;
    }
    Ok(())
}
