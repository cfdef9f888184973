//! Go API back-end: the types and interfaces a Go implementation satisfies.

use crate::lang::{GoTypes, method_header};
use rhizome_portal_bridge::naming::first_upper;
use rhizome_portal_bridge::{Artifact, BridgeError, Target, TargetConfig, map_type, package_name};
use rhizome_portal_ir::{ApiType, InterfaceType, Primitive, StructType, validate};
use std::fmt::Write as FmtWrite;
use tracing::info;

/// Emits `<api_pkg>/gen.go`.
pub struct GoApi;

impl GoApi {
    pub fn render(&self, api: &ApiType, package: &str) -> Result<String, BridgeError> {
        validate(api)?;

        let mut out = String::new();
        writeln!(out, "// Code generated by portal. DO NOT EDIT.\n")?;
        writeln!(out, "package {}", package)?;

        for e in &api.enums {
            write_enum(&mut out, e)?;
        }
        for s in &api.structs {
            write_struct(&mut out, s)?;
        }
        for iface in &api.interfaces {
            write_interface(&mut out, iface)?;
        }
        Ok(out)
    }
}

impl Target for GoApi {
    fn name(&self) -> &'static str {
        "go-api"
    }

    fn generate(&self, api: &ApiType, config: &TargetConfig) -> Result<Vec<Artifact>, BridgeError> {
        let package = config.api_package();
        let name = package_name(&package);
        let artifact = Artifact::new(
            &package,
            "gen",
            Some(name),
            &config.file_prefixes,
            ".go",
            self.render(api, name)?,
        );

        info!(path = %artifact.path, "generated go api");
        Ok(vec![artifact])
    }
}

/// Whether the Go enum type is `string` rather than `int64`.
fn string_backed(e: &StructType) -> bool {
    e.properties
        .iter()
        .any(|m| Primitive::from_name(&m.ty) == Some(Primitive::String))
}

fn write_enum(out: &mut String, e: &StructType) -> Result<(), BridgeError> {
    let string = string_backed(e);
    let base = if string { "string" } else { "int64" };

    writeln!(out, "\ntype {} {}\n", e.name, base)?;
    writeln!(out, "const (")?;
    for (ordinal, member) in e.properties.iter().enumerate() {
        if string {
            writeln!(out, "\t{0}{1} {0} = \"{1}\"", e.name, member.name)?;
        } else {
            writeln!(out, "\t{0}{1} {0} = {2}", e.name, member.name, ordinal)?;
        }
    }
    writeln!(out, ")")?;
    Ok(())
}

fn write_struct(out: &mut String, s: &StructType) -> Result<(), BridgeError> {
    writeln!(out, "\ntype {} struct {{", s.name)?;
    for prop in &s.properties {
        let ty = map_type(&GoTypes::LOCAL, &prop.ty)?;
        writeln!(out, "\t{} {}", first_upper(&prop.name), ty)?;
    }
    writeln!(out, "}}")?;
    Ok(())
}

fn write_interface(out: &mut String, iface: &InterfaceType) -> Result<(), BridgeError> {
    writeln!(out, "\ntype {} interface {{", iface.name)?;
    for func in &iface.functions {
        writeln!(out, "\t{}", method_header(func, &GoTypes::LOCAL)?)?;
    }
    writeln!(out, "}}")?;
    Ok(())
}
