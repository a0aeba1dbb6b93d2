use std::{fmt::Debug, hash::Hash, sync::Arc, time::Duration};

use futures::StreamExt;
use k8s_openapi::api::core::v1::ConfigMap as K8sConfigMap;
use kube::{
    Api, Client, Resource, ResourceExt,
    runtime::{Controller, controller::Action, watcher},
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        common::entities::NamespacedName, error::OperatorError, proxy::ports::ProxyService,
    },
    infrastructure::crds::ProxyResource,
};

/// Shared state handed to every reconciliation by the controller runtime.
pub struct ControllerContext<S>
where
    S: ProxyService,
{
    pub service: Arc<S>,
    pub retry_interval: Duration,
}

impl<S> ControllerContext<S>
where
    S: ProxyService,
{
    pub fn new(service: Arc<S>, retry_interval: Duration) -> Self {
        Self {
            service,
            retry_interval,
        }
    }
}

/// Turns a watch event into a reconcile request. The object itself is
/// ignored beyond its identity.
pub async fn reconcile<K, S>(
    object: Arc<K>,
    ctx: Arc<ControllerContext<S>>,
) -> Result<Action, OperatorError>
where
    K: Resource,
    S: ProxyService,
{
    let request = NamespacedName::new(object.namespace().unwrap_or_default(), object.name_any());

    let outcome = ctx.service.reconcile(&request).await?;
    debug!("reconcile request '{}' finished: {:?}", request, outcome);

    Ok(Action::await_change())
}

pub fn error_policy<K, S>(
    object: Arc<K>,
    error: &OperatorError,
    ctx: Arc<ControllerContext<S>>,
) -> Action
where
    K: Resource,
    S: ProxyService,
{
    warn!(
        "reconciliation of '{}' failed: {}; retrying in {:?}",
        object.name_any(),
        error,
        ctx.retry_interval
    );
    Action::requeue(ctx.retry_interval)
}

async fn run_controller<K, S>(name: &'static str, api: Api<K>, ctx: Arc<ControllerContext<S>>)
where
    K: Resource + Clone + DeserializeOwned + Debug + Send + Sync + 'static,
    K::DynamicType: Default + Clone + Debug + Eq + Hash + Unpin,
    S: ProxyService + 'static,
{
    info!("{} controller started", name);

    Controller::new(api, watcher::Config::default())
        .shutdown_on_signal()
        .run(reconcile::<K, S>, error_policy::<K, S>, ctx)
        .for_each(|result| async move {
            match result {
                Ok((object, _)) => debug!("{} controller reconciled {}", name, object),
                Err(e) => warn!("{} controller error: {}", name, e),
            }
        })
        .await;

    info!("{} controller stopped", name);
}

/// Watches `Proxy` objects cluster-wide.
pub async fn run_proxy_controller<S>(client: Client, ctx: Arc<ControllerContext<S>>)
where
    S: ProxyService + 'static,
{
    let proxies: Api<ProxyResource> = Api::all(client);
    run_controller("proxy", proxies, ctx).await;
}

/// Watches ConfigMaps in the namespace holding user-provided CA bundles.
pub async fn run_trust_bundle_controller<S>(
    client: Client,
    namespace: &str,
    ctx: Arc<ControllerContext<S>>,
) where
    S: ProxyService + 'static,
{
    let config_maps: Api<K8sConfigMap> = Api::namespaced(client, namespace);
    run_controller("trust bundle", config_maps, ctx).await;
}
