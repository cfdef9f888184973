//! Sample API descriptions shared by the target test suites.

use crate::api::{ApiType, FunctionType, InterfaceType, StructType, VarType};

/// A single singleton interface exchanging byte buffers.
pub fn command_handler_api() -> ApiType {
    let execute = FunctionType::new(
        "execute",
        vec![VarType::new("command", "Uint8Array")],
        "Uint8Array",
    );

    ApiType {
        interfaces: vec![InterfaceType::new("CommandHandler", vec![execute]).singleton()],
        structs: vec![],
        enums: vec![],
    }
}

/// Store API: a singleton factory, a handle-backed store, and two fold
/// interfaces chained off the store.
pub fn stores_api() -> ApiType {
    let source_type = StructType::new(
        "SourceType",
        vec![
            VarType::new("FS", "string"),
            VarType::new("GIT", "string"),
            VarType::new("S3", "string"),
            VarType::new("HTTP", "string"),
        ],
    );
    let content_type = StructType::new(
        "ContentType",
        vec![
            VarType::new("BLOBS", "string"),
            VarType::new("CONFIGS", "string"),
        ],
    );

    let store_cfg = StructType::new("StoreCfg", vec![VarType::new("sources", "StoreSource[]")]);
    let store_source = StructType::new(
        "StoreSource",
        vec![
            VarType::new("src", "string"),
            VarType::new("typ", "SourceType"),
            VarType::new("content", "ContentType"),
        ],
    );
    let store_status = StructType::new(
        "StoreStatus",
        vec![
            VarType::new("ready", "boolean"),
            VarType::new("progress", "number"),
        ],
    );

    let stores = InterfaceType::new(
        "Stores",
        vec![
            FunctionType::new("open", vec![VarType::new("cfg", "StoreCfg")], "Store"),
            FunctionType::new("close", vec![VarType::new("store", "Store")], "void"),
        ],
    )
    .singleton();

    let store = InterfaceType::new(
        "Store",
        vec![
            FunctionType::new("config", vec![], "StoreCfg"),
            FunctionType::new("status", vec![], "StoreStatus"),
            FunctionType::new("blobReader", vec![VarType::new("basePath", "string")], "BlobReader"),
        ],
    )
    .handle();

    let blob_reader = InterfaceType::new(
        "BlobReader",
        vec![
            FunctionType::new("path", vec![], "string"),
            FunctionType::new("readOnlyBlob", vec![VarType::new("path", "string")], "ReadOnlyBlob"),
            FunctionType::new("syncBlobsToFs", vec![VarType::new("path", "string")], "string")
                .throwing(),
        ],
    )
    .fold();

    let read_only_blob = InterfaceType::new(
        "ReadOnlyBlob",
        vec![
            FunctionType::new("path", vec![], "string"),
            FunctionType::new("exists", vec![], "boolean"),
            FunctionType::new("size", vec![], "bigint").optional(),
        ],
    )
    .fold();

    let mut api = ApiType {
        interfaces: vec![stores, store, blob_reader, read_only_blob],
        structs: vec![store_cfg, store_source, store_status],
        enums: vec![source_type, content_type],
    };
    api.resolve_enums();
    api
}
