//! Target configuration loaded from TOML.
//!
//! ```toml
//! module = "github.com/example/stores"
//! clib_pkg = "internal/clib"
//! api_pkg = "api"
//! pkg_prefix = "pkg"
//!
//! [file_prefixes]
//! stores = "st_"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a target configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Package and file layout shared by all targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Go module path of the generated packages
    pub module: String,
    /// Package of the cgo bridge
    pub clib_pkg: String,
    /// Package of the companion API
    pub api_pkg: String,
    /// Optional prefix prepended to both packages
    pub pkg_prefix: Option<String>,
    /// Namespace to file-name prefix
    pub file_prefixes: BTreeMap<String, String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            module: String::new(),
            clib_pkg: "internal/clib".to_string(),
            api_pkg: "api".to_string(),
            pkg_prefix: None,
            file_prefixes: BTreeMap::new(),
        }
    }
}

impl TargetConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Package of the cgo bridge, including the prefix.
    pub fn clib_package(&self) -> String {
        self.prefixed(&self.clib_pkg)
    }

    /// Package of the companion API, including the prefix.
    pub fn api_package(&self) -> String {
        self.prefixed(&self.api_pkg)
    }

    /// Import path of a package inside the module.
    pub fn import_path(&self, package: &str) -> String {
        if self.module.is_empty() {
            package.to_string()
        } else {
            format!("{}/{}", self.module, package)
        }
    }

    fn prefixed(&self, package: &str) -> String {
        match self.pkg_prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => format!("{}/{}", prefix, package),
            _ => package.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TargetConfig::from_toml_str("module = \"example.com/m\"").unwrap();
        assert_eq!(config.clib_package(), "internal/clib");
        assert_eq!(config.api_package(), "api");
        assert_eq!(config.import_path("api"), "example.com/m/api");
    }

    #[test]
    fn test_prefix_and_file_prefixes() {
        let config = TargetConfig::from_toml_str(
            r#"
module = "example.com/m"
pkg_prefix = "pkg"
api_pkg = "stores"

[file_prefixes]
stores = "st_"
"#,
        )
        .unwrap();
        assert_eq!(config.clib_package(), "pkg/internal/clib");
        assert_eq!(config.api_package(), "pkg/stores");
        assert_eq!(config.file_prefixes["stores"], "st_");
    }

    #[test]
    fn test_invalid_config() {
        let err = TargetConfig::from_toml_str("module = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
