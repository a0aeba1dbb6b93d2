use thiserror::Error;

use crate::domain::proxy::validation::ProxyConfigError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OperatorError {
    #[error("internal server error: {message}")]
    InternalServerError { message: String },

    #[error("invalid operator configuration: {message}")]
    InvalidConfig { message: String },

    #[error("invalid proxy configuration: {message}")]
    InvalidSpec { message: String },

    #[error("invalid trust bundle: {message}")]
    InvalidTrustBundle { message: String },

    #[error("failed to merge trust bundles: {message}")]
    TrustBundleMerge { message: String },

    #[error("failed to load system trust bundle: {message}")]
    SystemTrustBundle { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("get api error: {message}")]
    GetApiError { message: String },

    #[error("create api error: {message}")]
    CreateApiError { message: String },

    #[error("update api error: {message}")]
    UpdateApiError { message: String },

    #[error("invalid cluster config: {message}")]
    InvalidClusterConfig { message: String },
}

impl From<ProxyConfigError> for OperatorError {
    fn from(error: ProxyConfigError) -> Self {
        OperatorError::InvalidSpec {
            message: error.to_string(),
        }
    }
}
