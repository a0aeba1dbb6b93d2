use tracing::{debug, info, warn};

use crate::domain::{
    common::{entities::ReconcileRequest, services::Service},
    config_map::ports::ConfigMapRepository,
    error::OperatorError,
    health::{
        entities::{DegradedReason, StatusComponent},
        ports::HealthReporter,
    },
    proxy::{
        entities::{Proxy, ProxySpec, ProxyStatus, ReconcileOutcome, SkipReason},
        ports::{ClusterConfigRepository, ProxyRepository, ProxyService},
        status::{ClusterFacts, desired_status, parse_machine_networks},
        validation::validate_proxy_spec,
    },
    trust_bundle::{
        entities::SyncAction,
        ports::{TrustBundleService, TrustStoreRepository},
    },
};

impl<P, CM, TS, CC, H> ProxyService for Service<P, CM, TS, CC, H>
where
    P: ProxyRepository,
    CM: ConfigMapRepository,
    TS: TrustStoreRepository,
    CC: ClusterConfigRepository,
    H: HealthReporter,
{
    async fn reconcile(
        &self,
        request: &ReconcileRequest,
    ) -> Result<ReconcileOutcome, OperatorError> {
        if *request == self.config.proxy {
            info!("reconciling proxy '{}'", request);

            let Some(proxy) = self.fetch_proxy().await? else {
                return Ok(ReconcileOutcome::Skipped(SkipReason::ProxyNotFound));
            };

            return self.converge(&proxy).await.map(ReconcileOutcome::Synced);
        }

        if request.namespace == self.config.additional_trust_bundle_namespace {
            return self.reconcile_additional_trust_bundle(request).await;
        }

        debug!("ignoring reconcile request for unknown object '{}'", request);
        Ok(ReconcileOutcome::Skipped(SkipReason::UnknownObject))
    }
}

impl<P, CM, TS, CC, H> Service<P, CM, TS, CC, H>
where
    P: ProxyRepository,
    CM: ConfigMapRepository,
    TS: TrustStoreRepository,
    CC: ClusterConfigRepository,
    H: HealthReporter,
{
    async fn reconcile_additional_trust_bundle(
        &self,
        request: &ReconcileRequest,
    ) -> Result<ReconcileOutcome, OperatorError> {
        info!("reconciling additional trust bundle configmap '{}'", request);

        let config_map = match self.config_map_repository.get(request).await {
            Ok(Some(config_map)) => config_map,
            Ok(None) => {
                debug!("configmap '{}' not found; reconciliation will be skipped", request);
                return Ok(ReconcileOutcome::Skipped(SkipReason::ConfigMapNotFound));
            }
            Err(e) => {
                self.report_degraded(
                    DegradedReason::TrustBundleFetchFailure,
                    format!("Failed to get additional trust bundle configmap '{request}' ({e})"),
                );
                return Err(e);
            }
        };

        let Some(proxy) = self.fetch_proxy().await? else {
            return Ok(ReconcileOutcome::Skipped(SkipReason::ProxyNotFound));
        };

        let trusted_ca = proxy.spec.trusted_ca_name();
        if trusted_ca != Some(config_map.name.as_str()) {
            debug!(
                "configmap '{}' is not the trustedCA of proxy '{}' or trustedCA is not set; reconciliation will be skipped",
                request, proxy.name
            );
            return Ok(ReconcileOutcome::Skipped(SkipReason::ReferenceMismatch {
                config_map: config_map.name,
                trusted_ca: trusted_ca.map(ToString::to_string),
            }));
        }

        self.converge(&proxy).await.map(ReconcileOutcome::Synced)
    }

    /// Shared pipeline for both triggers: validate, resolve, sync the trust
    /// bundle, then publish the proxy status. Reports exactly one health
    /// signal.
    async fn converge(&self, proxy: &Proxy) -> Result<SyncAction, OperatorError> {
        if !proxy.spec.is_proxy_configured() {
            debug!(
                "httpProxy, httpsProxy and noProxy not defined for proxy '{}'; validation will be skipped",
                proxy.name
            );
        }

        if let Err(e) = validate_proxy_spec(&proxy.spec) {
            self.report_degraded(
                DegradedReason::InvalidProxyConfig,
                invalid_configuration_message(&proxy.name, &e),
            );
            return Err(e.into());
        }

        let bundle = match self.resolve_trust_bundle(&proxy.spec).await {
            Ok(bundle) => bundle,
            Err(e) => {
                let (reason, message) = self.resolve_failure(proxy, &e);
                self.report_degraded(reason, message);
                return Err(e);
            }
        };

        let action = match self.sync_trust_bundle(&bundle).await {
            Ok(action) => action,
            Err(e) => {
                self.report_degraded(
                    DegradedReason::TrustBundleSyncFailure,
                    format!(
                        "Failed to sync trusted CA bundle configmap '{}' ({e})",
                        bundle.identity()
                    ),
                );
                return Err(e);
            }
        };

        self.sync_proxy_status(proxy).await?;

        self.health_reporter
            .set_not_degraded(StatusComponent::ProxyConfig);
        info!("reconciling proxy '{}' complete ({:?})", proxy.name, action);

        Ok(action)
    }

    async fn fetch_proxy(&self) -> Result<Option<Proxy>, OperatorError> {
        let name = self.config.proxy.name.as_str();

        match self.proxy_repository.get(name).await {
            Ok(Some(proxy)) => Ok(Some(proxy)),
            Ok(None) => {
                debug!("proxy '{}' not found; reconciliation will be skipped", name);
                Ok(None)
            }
            Err(e) => {
                self.report_degraded(
                    DegradedReason::ProxyFetchFailure,
                    format!("Failed to get proxy '{name}' ({e})"),
                );
                Err(e)
            }
        }
    }

    fn resolve_failure(&self, proxy: &Proxy, error: &OperatorError) -> (DegradedReason, String) {
        let Some(trusted_ca) = proxy.spec.trusted_ca_name() else {
            return (
                DegradedReason::GenerateConfigMapFailure,
                format!(
                    "Failed to generate system trust bundle configmap '{}' ({error}).",
                    self.config.trusted_ca_bundle
                ),
            );
        };

        let source = format!("{}/{}", self.config.additional_trust_bundle_namespace, trusted_ca);
        match error {
            OperatorError::NotFound { .. } | OperatorError::GetApiError { .. } => (
                DegradedReason::TrustBundleFetchFailure,
                format!("Failed to get additional trust bundle configmap '{source}' ({error})"),
            ),
            OperatorError::TrustBundleMerge { .. } => (
                DegradedReason::ProxyCaMergeFailure,
                invalid_configuration_message(&proxy.name, error),
            ),
            _ => (
                DegradedReason::TrustBundleValidationFailure,
                format!("Failed to validate additional trust bundle configmap '{source}' ({error})"),
            ),
        }
    }

    async fn sync_proxy_status(&self, proxy: &Proxy) -> Result<(), OperatorError> {
        let desired = self.desired_proxy_status(&proxy.spec).await?;

        if desired == proxy.status {
            debug!("status of proxy '{}' is up to date", proxy.name);
            return Ok(());
        }

        if let Err(e) = self
            .proxy_repository
            .update_status(&proxy.name, &desired)
            .await
        {
            self.report_degraded(
                DegradedReason::StatusError,
                format!("Could not update proxy '{}' status: {e}", proxy.name),
            );
            return Err(e);
        }

        info!("updated status of proxy '{}'", proxy.name);
        Ok(())
    }

    async fn desired_proxy_status(&self, spec: &ProxySpec) -> Result<ProxyStatus, OperatorError> {
        if !spec.has_proxy_endpoint() {
            return Ok(ProxyStatus::default());
        }

        let facts = self.collect_cluster_facts().await?;

        desired_status(spec, &facts).inspect_err(|e| {
            self.report_degraded(
                DegradedReason::StatusError,
                format!("Could not compute proxy status: {e}"),
            );
        })
    }

    async fn collect_cluster_facts(&self) -> Result<ClusterFacts, OperatorError> {
        let name = self.config.cluster_config_name.as_str();

        let infrastructure = self
            .cluster_config_repository
            .get_infrastructure(name)
            .await
            .and_then(|found| {
                found.ok_or_else(|| OperatorError::NotFound {
                    message: format!("infrastructure config '{name}' not found"),
                })
            })
            .inspect_err(|e| {
                self.report_degraded(
                    DegradedReason::InfraConfigError,
                    format!("Error getting infrastructure config '{name}': {e}"),
                );
            })?;

        let network = self
            .cluster_config_repository
            .get_network(name)
            .await
            .and_then(|found| {
                found.ok_or_else(|| OperatorError::NotFound {
                    message: format!("network config '{name}' not found"),
                })
            })
            .inspect_err(|e| {
                self.report_degraded(
                    DegradedReason::NetworkConfigError,
                    format!("Error getting network config '{name}': {e}"),
                );
            })?;

        let machine_networks = self.read_machine_networks().await.inspect_err(|e| {
            self.report_degraded(
                DegradedReason::ClusterConfigError,
                format!(
                    "Error getting cluster config configmap '{}': {e}",
                    self.config.install_config
                ),
            );
        })?;

        Ok(ClusterFacts {
            infrastructure,
            network,
            machine_networks,
        })
    }

    async fn read_machine_networks(&self) -> Result<Vec<String>, OperatorError> {
        let identity = &self.config.install_config;
        let key = self.config.install_config_key.as_str();

        let config_map = self
            .config_map_repository
            .get(identity)
            .await?
            .ok_or_else(|| OperatorError::NotFound {
                message: format!("configmap '{identity}' not found"),
            })?;

        let install_config =
            config_map
                .value(key)
                .ok_or_else(|| OperatorError::InvalidClusterConfig {
                    message: format!("configmap '{identity}' is missing data key '{key}'"),
                })?;

        parse_machine_networks(install_config)
    }

    fn report_degraded(&self, reason: DegradedReason, message: String) {
        warn!("{} degraded ({}): {}", StatusComponent::ProxyConfig, reason, message);
        self.health_reporter
            .set_degraded(StatusComponent::ProxyConfig, reason, message);
    }
}

fn invalid_configuration_message(name: &str, error: &dyn std::fmt::Display) -> String {
    format!(
        "The configuration is invalid for proxy '{name}' ({error}). Use 'oc edit proxy.config.openshift.io {name}' to fix."
    )
}
