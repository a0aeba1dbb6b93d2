use crate::domain::{
    common::OperatorConfig,
    config_map::ports::ConfigMapRepository,
    health::ports::HealthReporter,
    proxy::ports::{ClusterConfigRepository, ProxyRepository},
    trust_bundle::ports::TrustStoreRepository,
};

#[derive(Clone)]
pub struct Service<P, CM, TS, CC, H>
where
    P: ProxyRepository,
    CM: ConfigMapRepository,
    TS: TrustStoreRepository,
    CC: ClusterConfigRepository,
    H: HealthReporter,
{
    pub(crate) proxy_repository: P,
    pub(crate) config_map_repository: CM,
    pub(crate) trust_store_repository: TS,
    pub(crate) cluster_config_repository: CC,
    pub(crate) health_reporter: H,

    pub(crate) config: OperatorConfig,
}

impl<P, CM, TS, CC, H> Service<P, CM, TS, CC, H>
where
    P: ProxyRepository,
    CM: ConfigMapRepository,
    TS: TrustStoreRepository,
    CC: ClusterConfigRepository,
    H: HealthReporter,
{
    pub fn new(
        proxy_repository: P,
        config_map_repository: CM,
        trust_store_repository: TS,
        cluster_config_repository: CC,
        health_reporter: H,
        config: OperatorConfig,
    ) -> Self {
        Service {
            proxy_repository,
            config_map_repository,
            trust_store_repository,
            cluster_config_repository,
            health_reporter,
            config,
        }
    }
}
