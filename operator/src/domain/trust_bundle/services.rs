use tracing::{debug, info};

use crate::domain::{
    common::{entities::NamespacedName, services::Service},
    config_map::{entities::ConfigMap, ports::ConfigMapRepository},
    error::OperatorError,
    health::ports::HealthReporter,
    proxy::{
        entities::ProxySpec,
        ports::{ClusterConfigRepository, ProxyRepository},
    },
    trust_bundle::{
        entities::{BundleSource, DerivedTrustBundle, SyncAction},
        pem::{merge_trust_bundles, validate_certificate_bundle},
        ports::{TrustBundleService, TrustStoreRepository},
    },
};

impl<P, CM, TS, CC, H> TrustBundleService for Service<P, CM, TS, CC, H>
where
    P: ProxyRepository,
    CM: ConfigMapRepository,
    TS: TrustStoreRepository,
    CC: ClusterConfigRepository,
    H: HealthReporter,
{
    async fn resolve_trust_bundle(
        &self,
        spec: &ProxySpec,
    ) -> Result<DerivedTrustBundle, OperatorError> {
        match spec.trusted_ca_name() {
            None => self.generate_system_trust_bundle().await,
            Some(name) => self.merge_trusted_ca_bundle(name).await,
        }
    }

    async fn sync_trust_bundle(
        &self,
        candidate: &DerivedTrustBundle,
    ) -> Result<SyncAction, OperatorError> {
        let key = self.config.trusted_ca_bundle_key.as_str();
        let identity = candidate.identity();

        match self.config_map_repository.get(&identity).await? {
            None => {
                self.config_map_repository
                    .create(&candidate.to_config_map())
                    .await?;
                info!("created trusted CA bundle configmap '{}'", identity);
                Ok(SyncAction::Created)
            }
            Some(current) if current.value(key) == candidate.value(key) => {
                debug!("trusted CA bundle configmap '{}' is up to date", identity);
                Ok(SyncAction::Unchanged)
            }
            Some(current) => {
                let updated = ConfigMap {
                    data: candidate.data.clone(),
                    ..current
                };
                self.config_map_repository.update(&updated).await?;
                info!("updated trusted CA bundle configmap '{}'", identity);
                Ok(SyncAction::Updated)
            }
        }
    }
}

impl<P, CM, TS, CC, H> Service<P, CM, TS, CC, H>
where
    P: ProxyRepository,
    CM: ConfigMapRepository,
    TS: TrustStoreRepository,
    CC: ClusterConfigRepository,
    H: HealthReporter,
{
    async fn generate_system_trust_bundle(&self) -> Result<DerivedTrustBundle, OperatorError> {
        let system = self.load_system_trust_bundle().await?;

        Ok(DerivedTrustBundle::new(
            &self.config.trusted_ca_bundle,
            &self.config.trusted_ca_bundle_key,
            bundle_to_string(system)?,
            BundleSource::System,
        ))
    }

    async fn merge_trusted_ca_bundle(&self, name: &str) -> Result<DerivedTrustBundle, OperatorError> {
        let key = self.config.trusted_ca_bundle_key.as_str();
        let identity = NamespacedName::new(&self.config.additional_trust_bundle_namespace, name);

        let source = self
            .config_map_repository
            .get(&identity)
            .await?
            .ok_or_else(|| OperatorError::NotFound {
                message: format!("trustedCA configmap '{identity}' not found"),
            })?;

        let additional = source
            .value(key)
            .ok_or_else(|| OperatorError::InvalidTrustBundle {
                message: format!("configmap '{identity}' is missing data key '{key}'"),
            })?;

        validate_certificate_bundle(additional.as_bytes()).map_err(|e| {
            OperatorError::InvalidTrustBundle {
                message: format!("configmap '{identity}' data key '{key}': {e}"),
            }
        })?;

        let system = self.load_system_trust_bundle().await?;

        let merged = merge_trust_bundles(additional.as_bytes(), &system).map_err(|e| {
            OperatorError::TrustBundleMerge {
                message: e.to_string(),
            }
        })?;

        Ok(DerivedTrustBundle::new(
            &self.config.trusted_ca_bundle,
            key,
            bundle_to_string(merged)?,
            BundleSource::Merged {
                trusted_ca: identity,
            },
        ))
    }

    async fn load_system_trust_bundle(&self) -> Result<Vec<u8>, OperatorError> {
        let data = self.trust_store_repository.read_system_bundle().await?;

        validate_certificate_bundle(&data).map_err(|e| OperatorError::SystemTrustBundle {
            message: format!(
                "invalid trust bundle '{}': {e}",
                self.config.system_trust_bundle_path.display()
            ),
        })?;

        Ok(data)
    }
}

fn bundle_to_string(bundle: Vec<u8>) -> Result<String, OperatorError> {
    String::from_utf8(bundle).map_err(|e| OperatorError::InvalidTrustBundle {
        message: format!("bundle is not valid UTF-8: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use crate::domain::{
        common::{entities::NamespacedName, testing::TestServiceBuilder},
        config_map::entities::ConfigMap,
        error::OperatorError,
        proxy::test_helpers::{
            SYSTEM_CA, TRUSTED_CA_KEY, USER_CA, create_derived_bundle, create_proxy_spec,
            create_proxy_spec_with_trusted_ca, create_source_config_map,
            create_trusted_ca_bundle_config_map, expect_system_bundle, trusted_ca_bundle_identity,
        },
        trust_bundle::{
            entities::{BundleSource, SyncAction},
            ports::TrustBundleService,
        },
    };

    #[tokio::test]
    async fn test_resolve_without_trusted_ca_uses_system_bundle() {
        // Arrange
        let service = TestServiceBuilder::new()
            .customize_trust_store_repository(|mock| expect_system_bundle(mock, SYSTEM_CA))
            .build();

        // Act
        let bundle = service
            .resolve_trust_bundle(&create_proxy_spec())
            .await
            .unwrap();

        // Assert
        assert_eq!(bundle.identity(), trusted_ca_bundle_identity());
        assert_eq!(bundle.value(TRUSTED_CA_KEY), Some(SYSTEM_CA));
        assert_eq!(bundle.source, BundleSource::System);
    }

    #[tokio::test]
    async fn test_resolve_with_trusted_ca_merges_user_then_system() {
        // Arrange
        let service = TestServiceBuilder::new()
            .customize_config_map_repository(|mock| {
                mock.expect_get()
                    .with(eq(NamespacedName::new("openshift-config", "custom-ca")))
                    .times(1)
                    .returning(|_| {
                        Box::pin(async move { Ok(Some(create_source_config_map("custom-ca", USER_CA))) })
                    });
            })
            .customize_trust_store_repository(|mock| expect_system_bundle(mock, SYSTEM_CA))
            .build();

        // Act
        let bundle = service
            .resolve_trust_bundle(&create_proxy_spec_with_trusted_ca("custom-ca"))
            .await
            .unwrap();

        // Assert
        assert_eq!(
            bundle.value(TRUSTED_CA_KEY),
            Some(format!("{USER_CA}{SYSTEM_CA}").as_str())
        );
        assert_eq!(
            bundle.source,
            BundleSource::Merged {
                trusted_ca: NamespacedName::new("openshift-config", "custom-ca")
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_is_deterministic() {
        // Arrange
        let service = TestServiceBuilder::new()
            .customize_config_map_repository(|mock| {
                mock.expect_get().times(2).returning(|_| {
                    Box::pin(async move { Ok(Some(create_source_config_map("custom-ca", USER_CA))) })
                });
            })
            .customize_trust_store_repository(|mock| {
                mock.expect_read_system_bundle()
                    .times(2)
                    .returning(|| Box::pin(async move { Ok(SYSTEM_CA.as_bytes().to_vec()) }));
            })
            .build();
        let spec = create_proxy_spec_with_trusted_ca("custom-ca");

        // Act
        let first = service.resolve_trust_bundle(&spec).await.unwrap();
        let second = service.resolve_trust_bundle(&spec).await.unwrap();

        // Assert
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_resolve_missing_trusted_ca_config_map_fails() {
        // Arrange
        let service = TestServiceBuilder::new()
            .customize_config_map_repository(|mock| {
                mock.expect_get()
                    .times(1)
                    .returning(|_| Box::pin(async move { Ok(None) }));
            })
            .build();

        // Act
        let result = service
            .resolve_trust_bundle(&create_proxy_spec_with_trusted_ca("missing"))
            .await;

        // Assert
        match result.unwrap_err() {
            OperatorError::NotFound { message } => {
                assert_eq!(message, "trustedCA configmap 'openshift-config/missing' not found");
            }
            e => panic!("Expected NotFound error, got {e:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_trusted_ca_without_bundle_key_fails() {
        // Arrange
        let service = TestServiceBuilder::new()
            .customize_config_map_repository(|mock| {
                mock.expect_get().times(1).returning(|_| {
                    Box::pin(async move {
                        Ok(Some(
                            ConfigMap::new(&NamespacedName::new("openshift-config", "custom-ca"))
                                .with_data("other.crt", USER_CA),
                        ))
                    })
                });
            })
            .build();

        // Act
        let result = service
            .resolve_trust_bundle(&create_proxy_spec_with_trusted_ca("custom-ca"))
            .await;

        // Assert
        assert!(matches!(
            result,
            Err(OperatorError::InvalidTrustBundle { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_trusted_ca_with_invalid_pem_fails() {
        // Arrange
        let service = TestServiceBuilder::new()
            .customize_config_map_repository(|mock| {
                mock.expect_get().times(1).returning(|_| {
                    Box::pin(async move {
                        Ok(Some(create_source_config_map("custom-ca", "not a cert")))
                    })
                });
            })
            .build();

        // Act
        let result = service
            .resolve_trust_bundle(&create_proxy_spec_with_trusted_ca("custom-ca"))
            .await;

        // Assert
        assert!(matches!(
            result,
            Err(OperatorError::InvalidTrustBundle { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_with_invalid_system_bundle_fails() {
        // Arrange
        let service = TestServiceBuilder::new()
            .customize_trust_store_repository(|mock| expect_system_bundle(mock, "garbage"))
            .build();

        // Act
        let result = service.resolve_trust_bundle(&create_proxy_spec()).await;

        // Assert
        assert!(matches!(
            result,
            Err(OperatorError::SystemTrustBundle { .. })
        ));
    }

    #[tokio::test]
    async fn test_sync_creates_missing_bundle() {
        // Arrange
        let candidate = create_derived_bundle(SYSTEM_CA);
        let service = TestServiceBuilder::new()
            .customize_config_map_repository(|mock| {
                mock.expect_get()
                    .with(eq(trusted_ca_bundle_identity()))
                    .times(1)
                    .returning(|_| Box::pin(async move { Ok(None) }));
                mock.expect_create()
                    .withf(|cm: &ConfigMap| {
                        cm.identity() == trusted_ca_bundle_identity()
                            && cm.value(TRUSTED_CA_KEY) == Some(SYSTEM_CA)
                    })
                    .times(1)
                    .returning(|_| Box::pin(async move { Ok(()) }));
                mock.expect_update().never();
            })
            .build();

        // Act
        let action = service.sync_trust_bundle(&candidate).await.unwrap();

        // Assert
        assert_eq!(action, SyncAction::Created);
    }

    #[tokio::test]
    async fn test_sync_is_idempotent() {
        // Arrange
        let candidate = create_derived_bundle(SYSTEM_CA);
        let service = TestServiceBuilder::new()
            .customize_config_map_repository(|mock| {
                mock.expect_get()
                    .times(1)
                    .returning(|_| Box::pin(async move { Ok(None) }));
                mock.expect_get().times(1).returning(|_| {
                    Box::pin(async move {
                        Ok(Some(create_trusted_ca_bundle_config_map(SYSTEM_CA, "1")))
                    })
                });
                mock.expect_create()
                    .times(1)
                    .returning(|_| Box::pin(async move { Ok(()) }));
                mock.expect_update().never();
            })
            .build();

        // Act
        let first = service.sync_trust_bundle(&candidate).await.unwrap();
        let second = service.sync_trust_bundle(&candidate).await.unwrap();

        // Assert
        assert_eq!(first, SyncAction::Created);
        assert_eq!(second, SyncAction::Unchanged);
    }

    #[tokio::test]
    async fn test_sync_updates_stale_bundle_in_place() {
        // Arrange
        let candidate = create_derived_bundle(USER_CA);
        let service = TestServiceBuilder::new()
            .customize_config_map_repository(|mock| {
                mock.expect_get().times(1).returning(|_| {
                    Box::pin(async move {
                        let mut current = create_trusted_ca_bundle_config_map(SYSTEM_CA, "42");
                        current
                            .labels
                            .insert("config.openshift.io/inject-trusted-cabundle".into(), "true".into());
                        Ok(Some(current))
                    })
                });
                mock.expect_create().never();
                mock.expect_update()
                    .withf(|cm: &ConfigMap| {
                        cm.value(TRUSTED_CA_KEY) == Some(USER_CA)
                            && cm.resource_version.as_deref() == Some("42")
                            && cm.labels.contains_key("config.openshift.io/inject-trusted-cabundle")
                    })
                    .times(1)
                    .returning(|_| Box::pin(async move { Ok(()) }));
            })
            .build();

        // Act
        let action = service.sync_trust_bundle(&candidate).await.unwrap();

        // Assert
        assert_eq!(action, SyncAction::Updated);
    }

    #[tokio::test]
    async fn test_sync_propagates_get_error() {
        // Arrange
        let candidate = create_derived_bundle(SYSTEM_CA);
        let service = TestServiceBuilder::new()
            .customize_config_map_repository(|mock| {
                mock.expect_get().times(1).returning(|_| {
                    Box::pin(async move {
                        Err(OperatorError::GetApiError {
                            message: "connection refused".to_string(),
                        })
                    })
                });
                mock.expect_create().never();
            })
            .build();

        // Act
        let result = service.sync_trust_bundle(&candidate).await;

        // Assert
        assert_eq!(
            result,
            Err(OperatorError::GetApiError {
                message: "connection refused".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_sync_propagates_update_conflict() {
        // Arrange
        let candidate = create_derived_bundle(USER_CA);
        let service = TestServiceBuilder::new()
            .customize_config_map_repository(|mock| {
                mock.expect_get().times(1).returning(|_| {
                    Box::pin(async move {
                        Ok(Some(create_trusted_ca_bundle_config_map(SYSTEM_CA, "7")))
                    })
                });
                mock.expect_update().times(1).returning(|_| {
                    Box::pin(async move {
                        Err(OperatorError::UpdateApiError {
                            message: "the object has been modified".to_string(),
                        })
                    })
                });
            })
            .build();

        // Act
        let result = service.sync_trust_bundle(&candidate).await;

        // Assert
        assert!(matches!(result, Err(OperatorError::UpdateApiError { .. })));
    }
}
