use std::{path::PathBuf, time::Duration};

use crate::domain::{common::entities::NamespacedName, error::OperatorError};

pub mod entities;
pub mod services;

pub const PROXY_NAME: &str = "cluster";
pub const ADDITIONAL_TRUST_BUNDLE_NAMESPACE: &str = "openshift-config";
pub const TRUSTED_CA_BUNDLE_NAMESPACE: &str = "openshift-config-managed";
pub const TRUSTED_CA_BUNDLE_NAME: &str = "trusted-ca-bundle";
pub const TRUSTED_CA_BUNDLE_KEY: &str = "ca-bundle.crt";
pub const CLUSTER_CONFIG_NAME: &str = "cluster";
pub const INSTALL_CONFIG_NAMESPACE: &str = "kube-system";
pub const INSTALL_CONFIG_NAME: &str = "cluster-config-v1";
pub const INSTALL_CONFIG_KEY: &str = "install-config";
pub const SYSTEM_TRUST_BUNDLE_PATH: &str = "/etc/pki/ca-trust/extracted/pem/tls-ca-bundle.pem";
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorConfig {
    pub env: Environment,
    pub proxy: NamespacedName,
    pub additional_trust_bundle_namespace: String,
    pub trusted_ca_bundle: NamespacedName,
    pub trusted_ca_bundle_key: String,
    pub cluster_config_name: String,
    pub install_config: NamespacedName,
    pub install_config_key: String,
    pub system_trust_bundle_path: PathBuf,
    pub retry_interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Test,
    Development,
    Production,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        OperatorConfig {
            env: Environment::Development,
            proxy: NamespacedName::cluster_scoped(PROXY_NAME),
            additional_trust_bundle_namespace: ADDITIONAL_TRUST_BUNDLE_NAMESPACE.to_string(),
            trusted_ca_bundle: NamespacedName::new(
                TRUSTED_CA_BUNDLE_NAMESPACE,
                TRUSTED_CA_BUNDLE_NAME,
            ),
            trusted_ca_bundle_key: TRUSTED_CA_BUNDLE_KEY.to_string(),
            cluster_config_name: CLUSTER_CONFIG_NAME.to_string(),
            install_config: NamespacedName::new(INSTALL_CONFIG_NAMESPACE, INSTALL_CONFIG_NAME),
            install_config_key: INSTALL_CONFIG_KEY.to_string(),
            system_trust_bundle_path: PathBuf::from(SYSTEM_TRUST_BUNDLE_PATH),
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }
}

impl OperatorConfig {
    /// Rejects configurations that would make every reconciliation target
    /// the wrong object. Checked once before the controllers start.
    pub fn validate(&self) -> Result<(), OperatorError> {
        let required = [
            ("proxy name", self.proxy.name.as_str()),
            (
                "additional trust bundle namespace",
                self.additional_trust_bundle_namespace.as_str(),
            ),
            (
                "trusted CA bundle namespace",
                self.trusted_ca_bundle.namespace.as_str(),
            ),
            ("trusted CA bundle name", self.trusted_ca_bundle.name.as_str()),
            ("trusted CA bundle key", self.trusted_ca_bundle_key.as_str()),
            ("cluster config name", self.cluster_config_name.as_str()),
            ("install config namespace", self.install_config.namespace.as_str()),
            ("install config name", self.install_config.name.as_str()),
            ("install config key", self.install_config_key.as_str()),
        ];

        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(OperatorError::InvalidConfig {
                message: format!("{field} cannot be empty"),
            });
        }

        if !self.proxy.is_cluster_scoped() {
            return Err(OperatorError::InvalidConfig {
                message: format!("proxy '{}' must be cluster scoped", self.proxy),
            });
        }

        if self.system_trust_bundle_path.as_os_str().is_empty() {
            return Err(OperatorError::InvalidConfig {
                message: "system trust bundle path cannot be empty".to_string(),
            });
        }

        if self.retry_interval.is_zero() {
            return Err(OperatorError::InvalidConfig {
                message: "retry interval must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
