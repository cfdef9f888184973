//! Generated artifacts and the back-end trait.

use crate::bridge::BridgeError;
use crate::config::TargetConfig;
use rhizome_portal_ir::ApiType;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the output root, `/`-separated
    pub path: String,
    pub content: String,
}

impl Artifact {
    /// Artifact for the logical file `name` in `package`.
    ///
    /// Dots in the package become directory separators; `ext` includes the
    /// leading dot.
    pub fn new(
        package: &str,
        name: &str,
        ns: Option<&str>,
        prefixes: &BTreeMap<String, String>,
        ext: &str,
        content: String,
    ) -> Self {
        Self {
            path: format!("{}/{}{}", package_dir(package), file_name(name, ns, prefixes), ext),
            content,
        }
    }

    /// Write the artifact below `root`, creating parent directories.
    pub fn write_to(&self, root: &Path) -> io::Result<PathBuf> {
        let path = root.join(&self.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &self.content)?;
        Ok(path)
    }
}

/// Directory of a package (`a.b/c` -> `a/b/c`).
pub fn package_dir(package: &str) -> String {
    package.replace('.', "/")
}

/// Last element of a package path, used as the Go package name.
pub fn package_name(package: &str) -> &str {
    package.rsplit('/').next().unwrap_or(package)
}

/// File name for `name`, prefixed when the namespace has a configured prefix.
pub fn file_name(name: &str, ns: Option<&str>, prefixes: &BTreeMap<String, String>) -> String {
    match ns.and_then(|ns| prefixes.get(ns)) {
        Some(prefix) => format!("{}{}", prefix, name.to_lowercase()),
        None => name.to_lowercase(),
    }
}

/// A back-end producing artifacts for one target.
pub trait Target {
    /// Name used on the command line.
    fn name(&self) -> &'static str;

    fn generate(&self, api: &ApiType, config: &TargetConfig) -> Result<Vec<Artifact>, BridgeError>;
}
