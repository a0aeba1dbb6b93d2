use kube::{Api, Client};

use crate::{
    domain::{
        error::OperatorError,
        proxy::{
            entities::{InfrastructureConfig, NetworkConfig},
            ports::ClusterConfigRepository,
        },
    },
    infrastructure::crds::{InfrastructureResource, NetworkResource},
};

/// Read-only access to the cluster-scoped `config.openshift.io` objects.
#[derive(Clone)]
pub struct K8sClusterConfigRepository {
    client: Client,
}

impl K8sClusterConfigRepository {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ClusterConfigRepository for K8sClusterConfigRepository {
    async fn get_infrastructure(
        &self,
        name: &str,
    ) -> Result<Option<InfrastructureConfig>, OperatorError> {
        let api: Api<InfrastructureResource> = Api::all(self.client.clone());

        match api.get(name).await {
            Ok(resource) => Ok(Some(InfrastructureConfig::from(&resource))),
            Err(kube::Error::Api(api_err)) if api_err.code == 404 => Ok(None),
            Err(e) => Err(OperatorError::GetApiError {
                message: format!("failed to get infrastructure config '{name}': {e}"),
            }),
        }
    }

    async fn get_network(&self, name: &str) -> Result<Option<NetworkConfig>, OperatorError> {
        let api: Api<NetworkResource> = Api::all(self.client.clone());

        match api.get(name).await {
            Ok(resource) => Ok(Some(NetworkConfig::from(&resource))),
            Err(kube::Error::Api(api_err)) if api_err.code == 404 => Ok(None),
            Err(e) => Err(OperatorError::GetApiError {
                message: format!("failed to get network config '{name}': {e}"),
            }),
        }
    }
}
