use crate::domain::{
    common::entities::NamespacedName, config_map::entities::ConfigMap, error::OperatorError,
};

/// Object store access for ConfigMaps. A missing object is `Ok(None)`.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigMapRepository: Send + Sync {
    fn get(
        &self,
        identity: &NamespacedName,
    ) -> impl Future<Output = Result<Option<ConfigMap>, OperatorError>> + Send;
    fn create(
        &self,
        config_map: &ConfigMap,
    ) -> impl Future<Output = Result<(), OperatorError>> + Send;
    fn update(
        &self,
        config_map: &ConfigMap,
    ) -> impl Future<Output = Result<(), OperatorError>> + Send;
}
