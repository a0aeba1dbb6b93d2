use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusComponent {
    ProxyConfig,
}

impl fmt::Display for StatusComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusComponent::ProxyConfig => write!(f, "ProxyConfig"),
        }
    }
}

/// Stable reason codes attached to a degraded condition. Operators and
/// alerts match on these strings, so they must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DegradedReason {
    InvalidProxyConfig,
    GenerateConfigMapFailure,
    TrustBundleFetchFailure,
    TrustBundleValidationFailure,
    ProxyCaMergeFailure,
    TrustBundleSyncFailure,
    ProxyFetchFailure,
    InfraConfigError,
    NetworkConfigError,
    ClusterConfigError,
    StatusError,
}

impl DegradedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DegradedReason::InvalidProxyConfig => "InvalidProxyConfig",
            DegradedReason::GenerateConfigMapFailure => "GenerateConfigMapFailure",
            DegradedReason::TrustBundleFetchFailure => "TrustBundleFetchFailure",
            DegradedReason::TrustBundleValidationFailure => "TrustBundleValidationFailure",
            DegradedReason::ProxyCaMergeFailure => "ProxyCAMergeFailure",
            DegradedReason::TrustBundleSyncFailure => "TrustBundleSyncFailure",
            DegradedReason::ProxyFetchFailure => "ProxyFetchFailure",
            DegradedReason::InfraConfigError => "InfraConfigError",
            DegradedReason::NetworkConfigError => "NetworkConfigError",
            DegradedReason::ClusterConfigError => "ClusterConfigError",
            DegradedReason::StatusError => "StatusError",
        }
    }
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthSignal {
    pub component: StatusComponent,
    pub degraded: bool,
    pub reason: Option<DegradedReason>,
    pub message: Option<String>,
}

impl HealthSignal {
    pub fn degraded(component: StatusComponent, reason: DegradedReason, message: String) -> Self {
        HealthSignal {
            component,
            degraded: true,
            reason: Some(reason),
            message: Some(message),
        }
    }

    pub fn healthy(component: StatusComponent) -> Self {
        HealthSignal {
            component,
            degraded: false,
            reason: None,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes_are_stable() {
        assert_eq!(DegradedReason::InvalidProxyConfig.as_str(), "InvalidProxyConfig");
        assert_eq!(DegradedReason::ProxyCaMergeFailure.as_str(), "ProxyCAMergeFailure");
        assert_eq!(
            DegradedReason::TrustBundleSyncFailure.to_string(),
            "TrustBundleSyncFailure"
        );
    }
}
