//! cgo bridge back-end.
//!
//! Emits a single `package main` file exporting one C entry point per
//! non-folded function, plus the struct/enum converters and slice helpers
//! those entry points use.

use crate::lang::{CgoTypes, CgoValues, GoValues, c_field};
use rhizome_portal_bridge::naming::{first_lower, first_upper};
use rhizome_portal_bridge::{
    Artifact, Bridge, BridgeCompiler, BridgeError, EntryPoint, Special, Target, TargetConfig,
    map_type, map_value, package_name,
};
use rhizome_portal_ir::{ApiType, FunctionType, InterfaceType, StructType, VarType};
use rhizome_portal_target_c::declarations;
use std::fmt::Write as FmtWrite;
use tracing::{debug, info};

/// cgo capability set.
pub struct CgoBridge;

impl CgoBridge {
    fn table(iface: &str) -> String {
        format!("{}_handles", first_lower(iface))
    }
}

impl Bridge for CgoBridge {
    fn target(&self) -> &'static str {
        "cgo"
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
        Ok(format!("{} int64", index))
    }

    fn handle_value(&self, iface: &str, index: &str) -> Result<String, BridgeError> {
        Ok(format!("{}[{}]", Self::table(iface), index))
    }

    fn cleanup(&self, handle_value: &str) -> Result<String, BridgeError> {
        Ok(format!("{} = nil", handle_value))
    }

    fn fold_receiver(&self) -> Result<String, BridgeError> {
        Ok("folded".to_string())
    }

    fn fold_prelude(&self, chain: &str) -> Result<String, BridgeError> {
        Ok(format!("folded := {}", chain))
    }

    fn param_in(&self, param: &VarType) -> Result<Vec<String>, BridgeError> {
        let mut params = vec![format!("{} {}", param.name, map_type(&CgoTypes, &param.ty)?)];
        if param.is_array() {
            params.push(format!("{}_length C.size_t", param.name));
        }
        Ok(params)
    }

    fn param_out(&self, param: &VarType) -> Result<String, BridgeError> {
        Ok(map_value(&GoValues, &param.ty, &param.name, "")?)
    }

    fn call(&self, receiver: &str, func: &str, args: &[String]) -> String {
        format!("{}.{}({})", receiver, func, args.join(", "))
    }

    fn out_params(&self, func: &FunctionType) -> Vec<String> {
        let mut params = Vec::new();
        if func.return_optional {
            params.push("cok *C.short".to_string());
        }
        if func.throws {
            params.push("cerr **C.char".to_string());
        }
        params
    }

    fn return_type(&self, func: &FunctionType, new_handle: bool) -> Result<String, BridgeError> {
        if new_handle {
            return Ok("int64".to_string());
        }
        Ok(map_type(&CgoTypes, &func.return_type)?)
    }

    fn new_handle_body(&self, iface: &str, call: &str) -> Result<Vec<String>, BridgeError> {
        let table = Self::table(iface);
        Ok(vec![
            format!("{0} = append({0}, {1})", table, call),
            format!("return int64(len({}) - 1)", table),
        ])
    }

    fn fallible_body(&self, func: &FunctionType, call: &str) -> Result<Vec<String>, BridgeError> {
        let void = func.return_ref()?.is_void();

        let mut vars = Vec::new();
        if !void {
            vars.push("result");
        }
        if func.return_optional {
            vars.push("ok");
        }
        if func.throws {
            vars.push("err");
        }

        let mut body = vec![format!("{} := {}", vars.join(", "), call)];
        if func.return_optional {
            body.push("if ok {\n\t\t*cok = 1\n\t}".to_string());
        }
        if func.throws {
            body.push("if err != nil {\n\t\t*cerr = C.CString(err.Error())\n\t}".to_string());
        }
        if !void {
            body.push(map_value(&CgoValues, &func.return_type, "result", "return ")?);
        }
        Ok(body)
    }

    fn direct_body(&self, func: &FunctionType, call: &str) -> Result<Vec<String>, BridgeError> {
        Ok(vec![map_value(&CgoValues, &func.return_type, call, "return ")?])
    }

    fn render(&self, entry: &EntryPoint) -> String {
        let ret = if entry.return_type.is_empty() {
            String::new()
        } else {
            format!(" {}", entry.return_type)
        };
        format!(
            "//export {0}\nfunc {0}({1}){2} {{\n\t{3}\n}}\n",
            entry.name,
            entry.params.join(", "),
            ret,
            entry.body.join("\n\t")
        )
    }
}

/// Emits `<clib_pkg>/main/clib.go`.
pub struct CgoWrapper;

impl CgoWrapper {
    pub fn render(&self, api: &ApiType, config: &TargetConfig) -> Result<String, BridgeError> {
        let compiled = BridgeCompiler::new(&CgoBridge, Special::from_api(api)).compile_api(api)?;
        let singletons: Vec<&InterfaceType> = api.singletons().collect();
        let mut out = String::new();

        writeln!(out, "// Code generated by portal. DO NOT EDIT.\n")?;
        writeln!(out, "package main\n")?;
        writeln!(out, "/*\n#include <stdlib.h>\n#include <string.h>\n")?;
        out.push_str(&declarations(api)?);
        writeln!(out, "*/\nimport \"C\"\n")?;
        write_imports(&mut out, api, config, !singletons.is_empty())?;
        writeln!(out, "\nfunc main() {{}}\n")?;

        writeln!(out, "//=== INIT ===\n")?;
        for iface in &singletons {
            writeln!(out, "var {} api.{}", first_lower(&iface.name), iface.name)?;
        }
        for iface in api.handles() {
            writeln!(out, "var {} []api.{}", CgoBridge::table(&iface.name), iface.name)?;
        }
        write_init(&mut out, &singletons)?;

        for iface in &compiled {
            writeln!(out, "\n//=== {} ===", iface.name)?;
            for entry in &iface.entries {
                writeln!(out)?;
                out.push_str(&CgoBridge.render(entry));
            }
        }

        writeln!(out, "\n//=== ENUMS ===")?;
        for e in &api.enums {
            write_enum_converters(&mut out, e)?;
        }

        writeln!(out, "\n//=== STRUCTS ===")?;
        for s in &api.structs {
            write_struct_converters(&mut out, s)?;
        }

        out.push_str(UTIL);
        Ok(out)
    }
}

impl Target for CgoWrapper {
    fn name(&self) -> &'static str {
        "cgo"
    }

    fn generate(&self, api: &ApiType, config: &TargetConfig) -> Result<Vec<Artifact>, BridgeError> {
        let clib = config.clib_package();
        let artifact = Artifact::new(
            &format!("{}/main", clib),
            "clib",
            Some(package_name(&clib)),
            &config.file_prefixes,
            ".go",
            self.render(api, config)?,
        );

        info!(path = %artifact.path, "generated cgo wrapper");
        Ok(vec![artifact])
    }
}

fn write_imports(
    out: &mut String,
    api: &ApiType,
    config: &TargetConfig,
    singletons: bool,
) -> Result<(), BridgeError> {
    writeln!(out, "import (")?;
    if !api.enums.is_empty() {
        writeln!(out, "\t\"fmt\"")?;
    }
    writeln!(out, "\t\"unsafe\"")?;

    let uses_api = !api.interfaces.is_empty() || !api.structs.is_empty() || !api.enums.is_empty();
    if uses_api || singletons {
        writeln!(out)?;
    }
    if uses_api {
        writeln!(out, "\tapi \"{}\"", config.import_path(&config.api_package()))?;
    }
    if singletons {
        writeln!(out, "\tclib \"{}\"", config.import_path(&config.clib_package()))?;
    }
    writeln!(out, ")")?;
    Ok(())
}

/// Singleton getters and the `InitLibrary` entry point.
fn write_init(out: &mut String, singletons: &[&InterfaceType]) -> Result<(), BridgeError> {
    if singletons.is_empty() {
        writeln!(out, "\n//export InitLibrary\nfunc InitLibrary() {{}}")?;
        return Ok(());
    }

    writeln!(out, "\ntype cInit interface {{")?;
    for iface in singletons {
        writeln!(out, "\t{0}() api.{0}", iface.name)?;
    }
    writeln!(out, "}}\n")?;

    writeln!(out, "//export InitLibrary\nfunc InitLibrary() {{")?;
    writeln!(out, "\tvar init cInit = clib.NewInit()\n")?;
    for iface in singletons {
        writeln!(out, "\t{} = init.{}()", first_lower(&iface.name), iface.name)?;
    }
    writeln!(out, "}}")?;
    Ok(())
}

/// Ordinal compare chains in both directions.
fn write_enum_converters(out: &mut String, e: &StructType) -> Result<(), BridgeError> {
    debug!(name = %e.name, members = e.properties.len(), "emitting enum converters");

    writeln!(out, "\nfunc Go{0}(fromC *C.{0}) api.{0} {{", e.name)?;
    for (ordinal, member) in e.properties.iter().enumerate() {
        writeln!(out, "\tif *fromC == {} {{", ordinal)?;
        writeln!(out, "\t\treturn api.{}{}\n\t}}", e.name, member.name)?;
    }
    writeln!(out, "\n\tpanic(fmt.Sprintf(\"Unknown ordinal for {}: %d\", *fromC))", e.name)?;
    writeln!(out, "}}")?;

    writeln!(out, "\nfunc C{0}(fromGo api.{0}) C.{0} {{", e.name)?;
    for (ordinal, member) in e.properties.iter().enumerate() {
        writeln!(out, "\tif fromGo == api.{}{} {{", e.name, member.name)?;
        writeln!(out, "\t\treturn {}\n\t}}", ordinal)?;
    }
    writeln!(out, "\n\tpanic(fmt.Sprintf(\"Unknown value for {}: %v\", fromGo))", e.name)?;
    writeln!(out, "}}")?;
    Ok(())
}

/// Field-by-field converters in both directions.
fn write_struct_converters(out: &mut String, s: &StructType) -> Result<(), BridgeError> {
    writeln!(out, "\nfunc Go{0}(fromC *C.{0}) api.{0} {{", s.name)?;
    writeln!(out, "\treturn api.{}{{", s.name)?;
    for prop in &s.properties {
        let value = format!("fromC.{}", c_field(&prop.name));
        let converted = map_value(&GoValues, &prop.ty, &value, "")?;
        writeln!(out, "\t\t{}: {},", first_upper(&prop.name), converted)?;
    }
    writeln!(out, "\t}}\n}}")?;

    writeln!(out, "\nfunc C{0}(fromGo api.{0}) C.{0} {{", s.name)?;
    writeln!(out, "\treturn C.{}{{", s.name)?;
    for prop in &s.properties {
        let field = c_field(&prop.name);
        let value = format!("fromGo.{}", first_upper(&prop.name));
        let converted = map_value(&CgoValues, &prop.ty, &value, "")?;
        writeln!(out, "\t\t{}: {},", field, converted)?;
        if prop.is_array() {
            writeln!(out, "\t\t{}_length: C.size_t(len({})),", field, value)?;
        }
    }
    writeln!(out, "\t}}\n}}")?;
    Ok(())
}

const UTIL: &str = r#"
//=== UTIL ===

func GoStringSlice(array **C.char, length int) []string {
	slice := make([]string, 0, length)
	for _, v := range unsafe.Slice(array, length) {
		slice = append(slice, C.GoString(v))
	}
	return slice
}

func CStringSlice(array []string) **C.char {
	return CMapSlice(array, func(s string) *C.char { return C.CString(s) })
}

func CBool(flag bool) C.short {
	if flag {
		return C.short(1)
	}
	return C.short(0)
}

func GoMapSlice[T, U any](source *T, length int, f func(*T) U) []U {
	target := make([]U, 0, length)
	for _, t := range unsafe.Slice(source, length) {
		target = append(target, f(&t))
	}
	return target
}

func CMapSlice[T, U any](source []T, f func(T) U) *U {
	if len(source) == 0 {
		return nil
	}
	var zero U
	size := C.size_t(len(source)) * C.size_t(unsafe.Sizeof(zero))
	target := unsafe.Slice((*U)(C.malloc(size)), len(source))
	for i, t := range source {
		target[i] = f(t)
	}
	return &target[0]
}
"#;
