use crate::domain::{
    error::OperatorError,
    proxy::entities::ProxySpec,
    trust_bundle::entities::{DerivedTrustBundle, SyncAction},
};

pub trait TrustBundleService: Send + Sync {
    /// Builds the desired trust bundle for `spec` from current inputs.
    fn resolve_trust_bundle(
        &self,
        spec: &ProxySpec,
    ) -> impl Future<Output = Result<DerivedTrustBundle, OperatorError>> + Send;
    /// Makes the stored trust bundle match `candidate`, writing only when
    /// the bundle payload differs.
    fn sync_trust_bundle(
        &self,
        candidate: &DerivedTrustBundle,
    ) -> impl Future<Output = Result<SyncAction, OperatorError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait TrustStoreRepository: Send + Sync {
    fn read_system_bundle(&self) -> impl Future<Output = Result<Vec<u8>, OperatorError>> + Send;
}
