use std::collections::BTreeMap;

use crate::domain::{common::entities::NamespacedName, config_map::entities::ConfigMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleSource {
    /// The system trust store alone.
    System,
    /// The ConfigMap referenced by the proxy trustedCA, followed by the
    /// system trust store.
    Merged { trusted_ca: NamespacedName },
}

/// Candidate content of the operator-managed trust bundle ConfigMap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedTrustBundle {
    pub namespace: String,
    pub name: String,
    pub data: BTreeMap<String, String>,
    pub source: BundleSource,
}

impl DerivedTrustBundle {
    pub fn new(
        identity: &NamespacedName,
        key: &str,
        bundle: String,
        source: BundleSource,
    ) -> Self {
        DerivedTrustBundle {
            namespace: identity.namespace.clone(),
            name: identity.name.clone(),
            data: BTreeMap::from([(key.to_string(), bundle)]),
            source,
        }
    }

    pub fn identity(&self) -> NamespacedName {
        NamespacedName::new(&self.namespace, &self.name)
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn to_config_map(&self) -> ConfigMap {
        ConfigMap {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            data: self.data.clone(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Created,
    Updated,
    Unchanged,
}
