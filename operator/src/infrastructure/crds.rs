use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::proxy::entities::{
    InfrastructureConfig, NetworkConfig, Proxy, ProxySpec, ProxyStatus, TrustedCaReference,
};

/// `proxies.config.openshift.io`, cluster scoped. Only the object named
/// `cluster` is honored.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "config.openshift.io",
    version = "v1",
    kind = "Proxy",
    plural = "proxies",
    root = "ProxyResource",
    status = "ProxyResourceStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResourceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_proxy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https_proxy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_proxy: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub readiness_endpoints: Vec<String>,
    #[serde(rename = "trustedCA", default, skip_serializing_if = "Option::is_none")]
    pub trusted_ca: Option<ConfigMapNameReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ConfigMapNameReference {
    #[serde(default)]
    pub name: String,
}

/// Fields are always serialized so that a merge patch clears the ones set
/// to `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResourceStatus {
    #[serde(default)]
    pub http_proxy: Option<String>,
    #[serde(default)]
    pub https_proxy: Option<String>,
    #[serde(default)]
    pub no_proxy: Option<String>,
}

#[derive(CustomResource, Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "config.openshift.io",
    version = "v1",
    kind = "Infrastructure",
    plural = "infrastructures",
    root = "InfrastructureResource",
    status = "InfrastructureResourceStatus"
)]
pub struct InfrastructureResourceSpec {}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureResourceStatus {
    #[serde(rename = "apiServerInternalURI", default, skip_serializing_if = "Option::is_none")]
    pub api_server_internal_uri: Option<String>,
    /// Deprecated in favor of `platformStatus.type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_status: Option<PlatformStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct PlatformStatus {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub platform_type: Option<String>,
}

#[derive(CustomResource, Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "config.openshift.io",
    version = "v1",
    kind = "Network",
    plural = "networks",
    root = "NetworkResource",
    status = "NetworkResourceStatus"
)]
pub struct NetworkResourceSpec {}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkResourceStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_network: Vec<ClusterNetworkEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_network: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNetworkEntry {
    pub cidr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_prefix: Option<u32>,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|value| !value.is_empty()).cloned()
}

impl From<&ProxyResourceSpec> for ProxySpec {
    fn from(spec: &ProxyResourceSpec) -> Self {
        ProxySpec {
            http_proxy: non_empty(spec.http_proxy.as_ref()),
            https_proxy: non_empty(spec.https_proxy.as_ref()),
            no_proxy: non_empty(spec.no_proxy.as_ref()),
            readiness_endpoints: spec.readiness_endpoints.clone(),
            trusted_ca: spec
                .trusted_ca
                .as_ref()
                .and_then(|reference| non_empty(Some(&reference.name)))
                .map(|name| TrustedCaReference { name }),
        }
    }
}

impl From<&ProxyResourceStatus> for ProxyStatus {
    fn from(status: &ProxyResourceStatus) -> Self {
        ProxyStatus {
            http_proxy: non_empty(status.http_proxy.as_ref()),
            https_proxy: non_empty(status.https_proxy.as_ref()),
            no_proxy: non_empty(status.no_proxy.as_ref()),
        }
    }
}

impl From<&ProxyStatus> for ProxyResourceStatus {
    fn from(status: &ProxyStatus) -> Self {
        ProxyResourceStatus {
            http_proxy: status.http_proxy.clone(),
            https_proxy: status.https_proxy.clone(),
            no_proxy: status.no_proxy.clone(),
        }
    }
}

impl From<&ProxyResource> for Proxy {
    fn from(resource: &ProxyResource) -> Self {
        Proxy {
            name: resource.name_any(),
            spec: ProxySpec::from(&resource.spec),
            status: resource
                .status
                .as_ref()
                .map(ProxyStatus::from)
                .unwrap_or_default(),
        }
    }
}

impl From<&InfrastructureResource> for InfrastructureConfig {
    fn from(resource: &InfrastructureResource) -> Self {
        let status = resource.status.clone().unwrap_or_default();
        let platform = status
            .platform_status
            .and_then(|platform_status| platform_status.platform_type)
            .or(status.platform)
            .filter(|platform| !platform.is_empty());

        InfrastructureConfig {
            name: resource.name_any(),
            api_server_internal_uri: non_empty(status.api_server_internal_uri.as_ref()),
            platform,
        }
    }
}

impl From<&NetworkResource> for NetworkConfig {
    fn from(resource: &NetworkResource) -> Self {
        let status = resource.status.clone().unwrap_or_default();

        NetworkConfig {
            name: resource.name_any(),
            cluster_networks: status
                .cluster_network
                .into_iter()
                .map(|entry| entry.cidr)
                .collect(),
            service_networks: status.service_network,
        }
    }
}
