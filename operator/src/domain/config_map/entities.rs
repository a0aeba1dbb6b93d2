use std::collections::BTreeMap;

use crate::domain::common::entities::NamespacedName;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMap {
    pub namespace: String,
    pub name: String,
    pub data: BTreeMap<String, String>,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    /// Set on objects read from the store; carried into updates so that
    /// concurrent writers conflict instead of overwriting each other.
    pub resource_version: Option<String>,
}

impl ConfigMap {
    pub fn new(identity: &NamespacedName) -> Self {
        ConfigMap {
            namespace: identity.namespace.clone(),
            name: identity.name.clone(),
            ..Default::default()
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn identity(&self) -> NamespacedName {
        NamespacedName::new(&self.namespace, &self.name)
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}
