use k8s_openapi::{api::core::v1::ConfigMap as K8sConfigMap, apimachinery::pkg::apis::meta::v1::ObjectMeta};
use kube::{Api, Client, api::PostParams};
use tracing::debug;

use crate::domain::{
    common::entities::NamespacedName,
    config_map::{entities::ConfigMap, ports::ConfigMapRepository},
    error::OperatorError,
};

#[derive(Clone)]
pub struct K8sConfigMapRepository {
    client: Client,
}

impl K8sConfigMapRepository {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<K8sConfigMap> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

impl ConfigMapRepository for K8sConfigMapRepository {
    async fn get(&self, identity: &NamespacedName) -> Result<Option<ConfigMap>, OperatorError> {
        match self.api(&identity.namespace).get(&identity.name).await {
            Ok(config_map) => Ok(Some(from_k8s(config_map))),
            Err(kube::Error::Api(api_err)) if api_err.code == 404 => Ok(None),
            Err(e) => Err(OperatorError::GetApiError {
                message: format!("failed to get configmap '{identity}': {e}"),
            }),
        }
    }

    async fn create(&self, config_map: &ConfigMap) -> Result<(), OperatorError> {
        self.api(&config_map.namespace)
            .create(&PostParams::default(), &to_k8s(config_map))
            .await
            .map_err(|e| OperatorError::CreateApiError {
                message: format!("failed to create configmap '{}': {e}", config_map.identity()),
            })?;

        debug!("created configmap '{}'", config_map.identity());
        Ok(())
    }

    /// Replaces the whole object. The resource version read with the object
    /// makes the API server reject the write if it changed in between.
    async fn update(&self, config_map: &ConfigMap) -> Result<(), OperatorError> {
        self.api(&config_map.namespace)
            .replace(&config_map.name, &PostParams::default(), &to_k8s(config_map))
            .await
            .map_err(|e| OperatorError::UpdateApiError {
                message: format!("failed to update configmap '{}': {e}", config_map.identity()),
            })?;

        debug!("replaced configmap '{}'", config_map.identity());
        Ok(())
    }
}

fn from_k8s(config_map: K8sConfigMap) -> ConfigMap {
    let metadata = config_map.metadata;

    ConfigMap {
        namespace: metadata.namespace.unwrap_or_default(),
        name: metadata.name.unwrap_or_default(),
        data: config_map.data.unwrap_or_default(),
        labels: metadata.labels.unwrap_or_default(),
        annotations: metadata.annotations.unwrap_or_default(),
        resource_version: metadata.resource_version,
    }
}

fn to_k8s(config_map: &ConfigMap) -> K8sConfigMap {
    K8sConfigMap {
        metadata: ObjectMeta {
            name: Some(config_map.name.clone()),
            namespace: Some(config_map.namespace.clone()),
            labels: (!config_map.labels.is_empty()).then(|| config_map.labels.clone()),
            annotations: (!config_map.annotations.is_empty())
                .then(|| config_map.annotations.clone()),
            resource_version: config_map.resource_version.clone(),
            ..Default::default()
        },
        data: Some(config_map.data.clone()),
        ..Default::default()
    }
}
