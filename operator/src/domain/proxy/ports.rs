use crate::domain::{
    common::entities::ReconcileRequest,
    error::OperatorError,
    proxy::entities::{InfrastructureConfig, NetworkConfig, Proxy, ProxyStatus, ReconcileOutcome},
};

#[cfg_attr(test, mockall::automock)]
pub trait ProxyService: Send + Sync {
    /// Recomputes the trust bundle and proxy status from current state.
    /// `Err` asks the caller to retry later.
    fn reconcile(
        &self,
        request: &ReconcileRequest,
    ) -> impl Future<Output = Result<ReconcileOutcome, OperatorError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait ProxyRepository: Send + Sync {
    fn get(&self, name: &str) -> impl Future<Output = Result<Option<Proxy>, OperatorError>> + Send;
    fn update_status(
        &self,
        name: &str,
        status: &ProxyStatus,
    ) -> impl Future<Output = Result<(), OperatorError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait ClusterConfigRepository: Send + Sync {
    fn get_infrastructure(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<InfrastructureConfig>, OperatorError>> + Send;
    fn get_network(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<NetworkConfig>, OperatorError>> + Send;
}
