use std::sync::Arc;

use kube::Client;
use tracing::{debug, error, info, warn};

use crate::{
    application::proxy::controller::{
        ControllerContext, run_proxy_controller, run_trust_bundle_controller,
    },
    domain::{
        common::{OperatorConfig, services::Service},
        error::OperatorError,
    },
    infrastructure::{
        cluster_config::repositories::k8s::K8sClusterConfigRepository,
        config_map::repositories::k8s::K8sConfigMapRepository,
        health::status_manager::StatusManager,
        proxy::repositories::k8s::K8sProxyRepository,
        trust_bundle::repositories::file::FileTrustStoreRepository,
    },
};

pub mod args;
pub mod proxy;

pub type OperatorService = Service<
    K8sProxyRepository,
    K8sConfigMapRepository,
    FileTrustStoreRepository,
    K8sClusterConfigRepository,
    Arc<StatusManager>,
>;

pub struct OperatorApp;

pub fn create_service(
    client: Client,
    config: OperatorConfig,
    status_manager: Arc<StatusManager>,
) -> OperatorService {
    let trust_store_repository = FileTrustStoreRepository::new(&config.system_trust_bundle_path);

    Service::new(
        K8sProxyRepository::new(client.clone()),
        K8sConfigMapRepository::new(client.clone()),
        trust_store_repository,
        K8sClusterConfigRepository::new(client),
        status_manager,
        config,
    )
}

impl OperatorApp {
    pub async fn run(config: OperatorConfig) -> Result<(), OperatorError> {
        config.validate()?;

        debug!("initializing kubernetes client...");
        let client = Client::try_default().await.map_err(|e| {
            error!("unable to create the Kubernetes client: {:?}", e);
            OperatorError::InternalServerError {
                message: format!("Kubernetes client error: {}", e),
            }
        })?;

        info!("kubernetes client initialized");

        let status_manager = Arc::new(StatusManager::new());
        let namespace = config.additional_trust_bundle_namespace.clone();
        let retry_interval = config.retry_interval;

        let service = Arc::new(create_service(
            client.clone(),
            config,
            status_manager.clone(),
        ));
        let ctx = Arc::new(ControllerContext::new(service, retry_interval));
        info!("service initialized");

        let proxy_controller = run_proxy_controller(client.clone(), ctx.clone());
        let trust_bundle_controller = run_trust_bundle_controller(client, &namespace, ctx);

        tokio::select! {
            _ = proxy_controller => {
                info!("proxy controller has stopped");
            }
            _ = trust_bundle_controller => {
                info!("trust bundle controller has stopped");
            }
        }

        if status_manager.is_degraded() {
            warn!("shutting down while degraded");
        }

        Ok(())
    }
}
