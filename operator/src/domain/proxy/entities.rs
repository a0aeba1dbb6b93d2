use crate::domain::trust_bundle::entities::SyncAction;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Proxy {
    pub name: String,
    pub spec: ProxySpec,
    pub status: ProxyStatus,
}

/// Desired cluster-wide proxy settings.
///
/// `None` means the field is not set. When httpProxy, httpsProxy and
/// noProxy are all `None` the cluster does not use a proxy. `Some("")` is a
/// field that was set to an empty value and is rejected by validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxySpec {
    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
    pub no_proxy: Option<String>,
    pub readiness_endpoints: Vec<String>,
    pub trusted_ca: Option<TrustedCaReference>,
}

impl ProxySpec {
    pub fn is_proxy_configured(&self) -> bool {
        self.http_proxy.is_some() || self.https_proxy.is_some() || self.no_proxy.is_some()
    }

    /// Whether an HTTP or HTTPS proxy is set. Only then is a proxy status
    /// published.
    pub fn has_proxy_endpoint(&self) -> bool {
        self.http_proxy.is_some() || self.https_proxy.is_some()
    }

    pub fn trusted_ca_name(&self) -> Option<&str> {
        self.trusted_ca.as_ref().map(|reference| reference.name.as_str())
    }
}

/// Reference to a ConfigMap in the additional trust bundle namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedCaReference {
    pub name: String,
}

/// Effective proxy settings published for cluster components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyStatus {
    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
    pub no_proxy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfrastructureConfig {
    pub name: String,
    pub api_server_internal_uri: Option<String>,
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: String,
    pub cluster_networks: Vec<String>,
    pub service_networks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Synced(SyncAction),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The proxy was deleted after the request was queued.
    ProxyNotFound,
    /// The triggering ConfigMap was deleted after the request was queued.
    ConfigMapNotFound,
    /// The triggering ConfigMap is not the one referenced by trustedCA.
    ReferenceMismatch {
        config_map: String,
        trusted_ca: Option<String>,
    },
    UnknownObject,
}
