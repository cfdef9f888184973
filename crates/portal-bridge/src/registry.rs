//! Special interface registry and fold-chain state.

use rhizome_portal_ir::ApiType;
use std::collections::BTreeMap;

/// Interfaces that need special treatment at the boundary.
///
/// Built once per run from the API description and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Special {
    handle: Vec<String>,
    fold: Vec<String>,
}

impl Special {
    pub fn new<H, F>(handle: H, fold: F) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            handle: handle.into_iter().map(Into::into).collect(),
            fold: fold.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_api(api: &ApiType) -> Self {
        Self::new(
            api.interfaces.iter().filter(|i| i.handle).map(|i| i.name.clone()),
            api.interfaces.iter().filter(|i| i.fold).map(|i| i.name.clone()),
        )
    }

    /// Interfaces whose instances cross the boundary as table indexes, in
    /// declaration order.
    pub fn handles(&self) -> &[String] {
        &self.handle
    }

    /// Interfaces whose methods are composed into chains, in declaration
    /// order.
    pub fn folds(&self) -> &[String] {
        &self.fold
    }

    pub fn is_handle(&self, name: &str) -> bool {
        self.handle.iter().any(|h| h == name)
    }

    pub fn is_fold(&self, name: &str) -> bool {
        self.fold.iter().any(|f| f == name)
    }
}

/// One accumulated link of a fold chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldLink {
    /// Boundary parameters collected so far, in call order
    pub params: Vec<String>,
    /// Receiver expression produced by the chain so far
    pub expr: String,
}

/// In-flight fold chains, keyed by the fold interface they produce.
///
/// Passed into and returned from every compiler step; nothing else holds it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldChains {
    links: BTreeMap<String, FoldLink>,
}

impl FoldChains {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, fold: &str) -> Option<&FoldLink> {
        self.links.get(fold)
    }

    /// Return these chains with the link producing `fold` replaced.
    pub fn with(mut self, fold: impl Into<String>, link: FoldLink) -> Self {
        self.links.insert(fold.into(), link);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhizome_portal_ir::fixtures;

    #[test]
    fn test_from_api() {
        let special = Special::from_api(&fixtures::stores_api());
        assert_eq!(special.handles(), ["Store"]);
        assert_eq!(special.folds(), ["BlobReader", "ReadOnlyBlob"]);
        assert!(special.is_handle("Store"));
        assert!(!special.is_handle("Stores"));
        assert!(special.is_fold("ReadOnlyBlob"));
    }

    #[test]
    fn test_chains_replace_links() {
        let first = FoldLink {
            params: vec!["a".into()],
            expr: "x.A()".into(),
        };
        let second = FoldLink {
            params: vec!["a".into(), "b".into()],
            expr: "x.A().B()".into(),
        };

        let chains = FoldChains::new().with("F", first.clone());
        assert_eq!(chains.get("F"), Some(&first));

        let chains = chains.with("F", second.clone());
        assert_eq!(chains.len(), 1);
        assert_eq!(chains.get("F"), Some(&second));
        assert!(chains.get("G").is_none());
    }
}
