use std::path::PathBuf;

use tracing::debug;

use crate::domain::{error::OperatorError, trust_bundle::ports::TrustStoreRepository};

/// System trust store read from the local filesystem on every call.
#[derive(Debug, Clone)]
pub struct FileTrustStoreRepository {
    path: PathBuf,
}

impl FileTrustStoreRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TrustStoreRepository for FileTrustStoreRepository {
    async fn read_system_bundle(&self) -> Result<Vec<u8>, OperatorError> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| OperatorError::SystemTrustBundle {
                message: format!("failed to read '{}': {e}", self.path.display()),
            })?;

        debug!("read {} bytes from '{}'", data.len(), self.path.display());
        Ok(data)
    }
}
