use kube::{
    Api, Client,
    api::{Patch, PatchParams},
};
use serde_json::json;
use tracing::debug;

use crate::{
    domain::{
        error::OperatorError,
        proxy::{
            entities::{Proxy, ProxyStatus},
            ports::ProxyRepository,
        },
    },
    infrastructure::crds::{ProxyResource, ProxyResourceStatus},
};

#[derive(Clone)]
pub struct K8sProxyRepository {
    client: Client,
}

impl K8sProxyRepository {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self) -> Api<ProxyResource> {
        Api::all(self.client.clone())
    }
}

impl ProxyRepository for K8sProxyRepository {
    async fn get(&self, name: &str) -> Result<Option<Proxy>, OperatorError> {
        match self.api().get(name).await {
            Ok(resource) => Ok(Some(Proxy::from(&resource))),
            Err(kube::Error::Api(api_err)) if api_err.code == 404 => Ok(None),
            Err(e) => Err(OperatorError::GetApiError {
                message: format!("failed to get proxy '{name}': {e}"),
            }),
        }
    }

    async fn update_status(&self, name: &str, status: &ProxyStatus) -> Result<(), OperatorError> {
        let patch = json!({ "status": ProxyResourceStatus::from(status) });

        self.api()
            .patch_status(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(|e| OperatorError::UpdateApiError {
                message: format!("failed to update status of proxy '{name}': {e}"),
            })?;

        debug!("patched status of proxy '{}'", name);
        Ok(())
    }
}
