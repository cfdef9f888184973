//! Tests for the Go targets.

use crate::{CgoWrapper, GoApi, GoStubs};
use rhizome_portal_bridge::{BridgeError, Target, TargetConfig};
use rhizome_portal_ir::{ApiType, FunctionType, InterfaceType, StructType, VarType, fixtures};

fn config() -> TargetConfig {
    TargetConfig {
        module: "github.com/example/stores".into(),
        ..Default::default()
    }
}

fn stores_clib() -> String {
    CgoWrapper.render(&fixtures::stores_api(), &config()).unwrap()
}

#[test]
fn test_command_handler() {
    let clib = CgoWrapper
        .render(&fixtures::command_handler_api(), &config())
        .unwrap();

    assert!(clib.starts_with("// Code generated by portal. DO NOT EDIT.\n\npackage main\n"));
    assert!(clib.contains(
        "//export CommandHandler_Execute\n\
         func CommandHandler_Execute(command *C.char) *C.char {\n\
         \treturn (*C.char)(C.CBytes(commandHandler.Execute(C.GoBytes(unsafe.Pointer(command), C.int(C.strlen(command))))))\n\
         }\n"
    ));
    assert!(clib.contains("var commandHandler api.CommandHandler\n"));
    assert!(clib.contains("\tcommandHandler = init.CommandHandler()\n"));
    // no enums, so no fmt import
    assert!(!clib.contains("\"fmt\""));
}

#[test]
fn test_imports() {
    let clib = stores_clib();
    assert!(clib.contains(
        "import (\n\
         \t\"fmt\"\n\
         \t\"unsafe\"\n\
         \n\
         \tapi \"github.com/example/stores/api\"\n\
         \tclib \"github.com/example/stores/internal/clib\"\n\
         )\n"
    ));
}

#[test]
fn test_init_section() {
    let clib = stores_clib();
    assert!(clib.contains(
        "//=== INIT ===\n\n\
         var stores api.Stores\n\
         var store_handles []api.Store\n\n\
         type cInit interface {\n\
         \tStores() api.Stores\n\
         }\n\n\
         //export InitLibrary\n\
         func InitLibrary() {\n\
         \tvar init cInit = clib.NewInit()\n\n\
         \tstores = init.Stores()\n\
         }\n"
    ));
}

#[test]
fn test_handle_round_trip() {
    let clib = stores_clib();
    assert!(clib.contains(
        "func Stores_Open(cfg C.StoreCfg) int64 {\n\
         \tstore_handles = append(store_handles, stores.Open(GoStoreCfg(&cfg)))\n\
         \treturn int64(len(store_handles) - 1)\n\
         }\n"
    ));
    assert!(clib.contains(
        "func Stores_Close(handle int64) {\n\
         \tstores.Close(store_handles[handle])\n\
         \tstore_handles[handle] = nil\n\
         }\n"
    ));
    assert!(clib.contains(
        "func Store_Status(handle int64) C.StoreStatus {\n\
         \treturn CStoreStatus(store_handles[handle].Status())\n\
         }\n"
    ));
}

#[test]
fn test_throwing_closer() {
    let mut api = fixtures::stores_api();
    api.interfaces[0].functions[1].throws = true;
    let clib = CgoWrapper.render(&api, &config()).unwrap();

    assert!(clib.contains(
        "func Stores_Close(handle int64, cerr **C.char) {\n\
         \terr := stores.Close(store_handles[handle])\n\
         \tif err != nil {\n\
         \t\t*cerr = C.CString(err.Error())\n\
         \t}\n\
         \tstore_handles[handle] = nil\n\
         }\n"
    ));
}

#[test]
fn test_closer_on_fold() {
    let api = ApiType {
        interfaces: vec![
            InterfaceType::new("Store", vec![FunctionType::new("reader", vec![], "Reader")]).handle(),
            InterfaceType::new(
                "Reader",
                vec![FunctionType::new("release", vec![VarType::new("other", "Store")], "void")],
            )
            .fold(),
        ],
        ..Default::default()
    };
    let clib = CgoWrapper.render(&api, &config()).unwrap();

    assert!(clib.contains(
        "func Reader_Release(handle int64, other int64) {\n\
         \tfolded := store_handles[handle].Reader()\n\
         \tfolded.Release(store_handles[other])\n\
         \tstore_handles[other] = nil\n\
         }\n"
    ));
}

#[test]
fn test_fold_collapse() {
    let clib = stores_clib();

    assert!(clib.contains(
        "func BlobReader_Path(handle int64, basePath *C.char) *C.char {\n\
         \tfolded := store_handles[handle].BlobReader(C.GoString(basePath))\n\
         \treturn C.CString(folded.Path())\n\
         }\n"
    ));
    assert!(clib.contains(
        "func ReadOnlyBlob_Exists(handle int64, basePath *C.char, path *C.char) C.short {\n\
         \tfolded := store_handles[handle].BlobReader(C.GoString(basePath)).ReadOnlyBlob(C.GoString(path))\n\
         \treturn CBool(folded.Exists())\n\
         }\n"
    ));
    assert!(!clib.contains("Store_BlobReader"));
    assert!(!clib.contains("BlobReader_ReadOnlyBlob"));
}

#[test]
fn test_fallible_entries() {
    let clib = stores_clib();

    assert!(clib.contains(
        "func BlobReader_SyncBlobsToFs(handle int64, basePath *C.char, path *C.char, cerr **C.char) *C.char {\n\
         \tfolded := store_handles[handle].BlobReader(C.GoString(basePath))\n\
         \tresult, err := folded.SyncBlobsToFs(C.GoString(path))\n\
         \tif err != nil {\n\
         \t\t*cerr = C.CString(err.Error())\n\
         \t}\n\
         \treturn C.CString(result)\n\
         }\n"
    ));
    assert!(clib.contains(
        "func ReadOnlyBlob_Size(handle int64, basePath *C.char, path *C.char, cok *C.short) C.longlong {\n"
    ));
    assert!(clib.contains("\tresult, ok := folded.Size()\n\tif ok {\n\t\t*cok = 1\n\t}\n"));
}

#[test]
fn test_enum_converters() {
    let clib = stores_clib();

    assert!(clib.contains(
        "func GoContentType(fromC *C.ContentType) api.ContentType {\n\
         \tif *fromC == 0 {\n\
         \t\treturn api.ContentTypeBLOBS\n\
         \t}\n\
         \tif *fromC == 1 {\n\
         \t\treturn api.ContentTypeCONFIGS\n\
         \t}\n\
         \n\
         \tpanic(fmt.Sprintf(\"Unknown ordinal for ContentType: %d\", *fromC))\n\
         }\n"
    ));
    assert!(clib.contains("\tif fromGo == api.SourceTypeS3 {\n\t\treturn 2\n\t}\n"));
    assert!(clib.contains("panic(fmt.Sprintf(\"Unknown value for SourceType: %v\", fromGo))"));
}

#[test]
fn test_struct_converters() {
    let clib = stores_clib();

    assert!(clib.contains(
        "\t\tSources: GoMapSlice(fromC.sources, int(fromC.sources_length), GoStoreSource),\n"
    ));
    assert!(clib.contains(
        "\t\tsources: CMapSlice(fromGo.Sources, CStoreSource),\n\
         \t\tsources_length: C.size_t(len(fromGo.Sources)),\n"
    ));
    assert!(clib.contains("\t\tTyp: GoSourceType(&fromC.typ),\n"));
    assert!(clib.contains("\t\ttyp: CSourceType(fromGo.Typ),\n"));
    assert!(clib.contains("\t\tReady: bool(fromC.ready == 1),\n"));
}

#[test]
fn test_keyword_fields() {
    let api = ApiType {
        structs: vec![StructType::new("Entry", vec![VarType::new("type", "string")])],
        ..Default::default()
    };
    let clib = CgoWrapper.render(&api, &config()).unwrap();

    assert!(clib.contains("\t\tType: C.GoString(fromC._type),\n"));
    assert!(clib.contains("\t\t_type: C.CString(fromGo.Type),\n"));
}

#[test]
fn test_preamble_declarations() {
    let clib = stores_clib();
    assert!(clib.contains("/*\n#include <stdlib.h>\n#include <string.h>\n\ntypedef long long longlong;\n"));
    assert!(clib.contains("typedef struct StoreSource StoreSource;\n"));
    assert!(clib.contains("*/\nimport \"C\"\n"));
}

#[test]
fn test_no_singletons() {
    let api = ApiType {
        structs: vec![StructType::new("Point", vec![VarType::new("x", "number")])],
        ..Default::default()
    };
    let clib = CgoWrapper.render(&api, &config()).unwrap();

    assert!(clib.contains("//export InitLibrary\nfunc InitLibrary() {}\n"));
    assert!(!clib.contains("cInit"));
    assert!(!clib.contains("clib \""));
}

#[test]
fn test_unknown_type_aborts() {
    let mut api = fixtures::command_handler_api();
    api.interfaces[0].functions[0].params[0].ty = "[number,string]".into();

    let err = CgoWrapper.render(&api, &config()).unwrap_err();
    assert!(matches!(err, BridgeError::Validation(_)));
    assert!(err.to_string().contains("Tuples not supported: [number,string]"));
}

#[test]
fn test_go_api() {
    let code = GoApi.render(&fixtures::stores_api(), "api").unwrap();

    assert!(code.contains("package api\n"));
    assert!(code.contains(
        "type SourceType string\n\n\
         const (\n\
         \tSourceTypeFS SourceType = \"FS\"\n\
         \tSourceTypeGIT SourceType = \"GIT\"\n"
    ));
    assert!(code.contains("type StoreCfg struct {\n\tSources []StoreSource\n}\n"));
    assert!(code.contains(
        "type Stores interface {\n\
         \tOpen(cfg StoreCfg) Store\n\
         \tClose(store Store)\n\
         }\n"
    ));
    assert!(code.contains("\tSyncBlobsToFs(path string) (string, error)\n"));
    assert!(code.contains("\tSize() (int64, bool)\n"));
}

#[test]
fn test_go_api_number_enum() {
    let api = ApiType {
        enums: vec![StructType::new(
            "Level",
            vec![VarType::new("Low", "number"), VarType::new("High", "number")],
        )],
        ..Default::default()
    };
    let code = GoApi.render(&api, "api").unwrap();

    assert!(code.contains("type Level int64\n"));
    assert!(code.contains("\tLevelLow Level = 0\n\tLevelHigh Level = 1\n"));
}

#[test]
fn test_go_stubs() {
    let code = GoStubs.render(&fixtures::stores_api(), &config()).unwrap();

    assert!(code.starts_with("package clib\n\nimport api \"github.com/example/stores/api\"\n"));
    assert!(code.contains("func NewInit() *Init {\n\treturn &Init{}\n}\n"));
    assert!(code.contains("func (i *Init) Stores() api.Stores {\n\treturn NewStores()\n}\n"));
    assert!(code.contains("func NewStore() *Store {\n\treturn &Store{}\n}\n"));
    assert!(code.contains(
        "func (s *Stores) Open(cfg api.StoreCfg) api.Store {\n\
         \tpanic(\"not implemented yet\")\n\
         }\n"
    ));
    // only singletons get an Init getter
    assert!(!code.contains("func (i *Init) Store()"));
}

#[test]
fn test_artifact_paths() {
    let mut config = config();
    config.pkg_prefix = Some("pkg".into());
    config.file_prefixes.insert("api".into(), "st_".into());
    let api = fixtures::stores_api();

    let paths: Vec<String> = [
        CgoWrapper.generate(&api, &config).unwrap(),
        GoApi.generate(&api, &config).unwrap(),
        GoStubs.generate(&api, &config).unwrap(),
    ]
    .into_iter()
    .flatten()
    .map(|a| a.path)
    .collect();

    assert_eq!(
        paths,
        vec![
            "pkg/internal/clib/main/clib.go",
            "pkg/api/st_gen.go",
            "pkg/internal/clib/gen.go",
        ]
    );
}
