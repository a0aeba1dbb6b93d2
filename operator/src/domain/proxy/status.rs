use std::collections::BTreeSet;

use serde::Deserialize;
use url::Url;

use crate::domain::{
    error::OperatorError,
    proxy::entities::{InfrastructureConfig, NetworkConfig, ProxySpec, ProxyStatus},
};

/// Destinations that never go through the proxy.
pub const DEFAULT_NO_PROXY: [&str; 4] = ["127.0.0.1", "localhost", ".svc", ".cluster.local"];

const METADATA_SERVICE_ADDRESS: &str = "169.254.169.254";
const METADATA_SERVICE_PLATFORMS: [&str; 4] = ["AWS", "GCP", "Azure", "OpenStack"];
const NO_PROXY_WILDCARD: &str = "*";

/// Cluster facts read before computing the proxy status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterFacts {
    pub infrastructure: InfrastructureConfig,
    pub network: NetworkConfig,
    pub machine_networks: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct InstallConfig {
    #[serde(default)]
    networking: InstallConfigNetworking,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstallConfigNetworking {
    #[serde(default)]
    machine_network: Vec<MachineNetworkEntry>,
    #[serde(rename = "machineCIDR", default)]
    machine_cidr: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MachineNetworkEntry {
    cidr: String,
}

/// Extracts the machine network CIDRs from an install-config document.
/// `networking.machineNetwork` wins over the legacy `networking.machineCIDR`.
pub fn parse_machine_networks(install_config: &str) -> Result<Vec<String>, OperatorError> {
    let config: InstallConfig =
        serde_yaml::from_str(install_config).map_err(|e| OperatorError::InvalidClusterConfig {
            message: format!("failed to parse install-config: {e}"),
        })?;

    let networking = config.networking;
    if !networking.machine_network.is_empty() {
        return Ok(networking
            .machine_network
            .into_iter()
            .map(|entry| entry.cidr)
            .collect());
    }

    Ok(networking
        .machine_cidr
        .filter(|cidr| !cidr.trim().is_empty())
        .into_iter()
        .collect())
}

pub fn desired_status(spec: &ProxySpec, facts: &ClusterFacts) -> Result<ProxyStatus, OperatorError> {
    if !spec.has_proxy_endpoint() {
        return Ok(ProxyStatus::default());
    }

    Ok(ProxyStatus {
        http_proxy: spec.http_proxy.clone(),
        https_proxy: spec.https_proxy.clone(),
        no_proxy: Some(merge_no_proxy(spec.no_proxy.as_deref(), facts)?),
    })
}

/// Sorted, de-duplicated union of the user entries and the cluster-internal
/// destinations, joined with commas.
fn merge_no_proxy(user_no_proxy: Option<&str>, facts: &ClusterFacts) -> Result<String, OperatorError> {
    if user_no_proxy.map(str::trim) == Some(NO_PROXY_WILDCARD) {
        return Ok(NO_PROXY_WILDCARD.to_string());
    }

    let mut entries: BTreeSet<String> = DEFAULT_NO_PROXY.iter().map(ToString::to_string).collect();

    entries.insert(api_server_internal_host(&facts.infrastructure)?);
    entries.extend(facts.machine_networks.iter().cloned());
    entries.extend(facts.network.service_networks.iter().cloned());
    entries.extend(facts.network.cluster_networks.iter().cloned());

    if facts
        .infrastructure
        .platform
        .as_deref()
        .is_some_and(|platform| METADATA_SERVICE_PLATFORMS.contains(&platform))
    {
        entries.insert(METADATA_SERVICE_ADDRESS.to_string());
    }

    if let Some(user_no_proxy) = user_no_proxy {
        entries.extend(
            user_no_proxy
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(ToString::to_string),
        );
    }

    Ok(entries.into_iter().collect::<Vec<_>>().join(","))
}

fn api_server_internal_host(infrastructure: &InfrastructureConfig) -> Result<String, OperatorError> {
    let uri = infrastructure
        .api_server_internal_uri
        .as_deref()
        .filter(|uri| !uri.trim().is_empty())
        .ok_or_else(|| OperatorError::InvalidClusterConfig {
            message: format!(
                "infrastructure '{}' has no apiServerInternalURI",
                infrastructure.name
            ),
        })?;

    let url = Url::parse(uri).map_err(|e| OperatorError::InvalidClusterConfig {
        message: format!("invalid apiServerInternalURI '{uri}': {e}"),
    })?;

    url.host_str()
        .filter(|host| !host.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| OperatorError::InvalidClusterConfig {
            message: format!("apiServerInternalURI '{uri}' has no host"),
        })
}
