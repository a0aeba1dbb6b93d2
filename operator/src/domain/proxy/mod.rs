pub mod entities;
pub mod ports;
pub mod services;
pub mod status;
pub mod validation;

#[cfg(test)]
pub mod test_helpers {
    use mockall::predicate::eq;

    use crate::domain::{
        common::{
            ADDITIONAL_TRUST_BUNDLE_NAMESPACE, PROXY_NAME, TRUSTED_CA_BUNDLE_KEY,
            TRUSTED_CA_BUNDLE_NAME, TRUSTED_CA_BUNDLE_NAMESPACE, entities::NamespacedName,
        },
        config_map::entities::ConfigMap,
        health::{
            entities::{DegradedReason, StatusComponent},
            ports::MockHealthReporter,
        },
        proxy::{
            entities::{
                InfrastructureConfig, NetworkConfig, Proxy, ProxySpec, TrustedCaReference,
            },
            ports::MockProxyRepository,
            status::ClusterFacts,
        },
        trust_bundle::{
            entities::{BundleSource, DerivedTrustBundle},
            ports::MockTrustStoreRepository,
        },
    };

    pub const USER_CA: &str = include_str!("../trust_bundle/testdata/user-ca.pem");
    pub const SYSTEM_CA: &str = include_str!("../trust_bundle/testdata/system-ca.pem");
    pub const TRUSTED_CA_KEY: &str = TRUSTED_CA_BUNDLE_KEY;

    pub const INSTALL_CONFIG: &str = r#"apiVersion: v1
baseDomain: example.com
metadata:
  name: demo
networking:
  clusterNetwork:
  - cidr: 10.128.0.0/14
    hostPrefix: 23
  machineNetwork:
  - cidr: 10.0.0.0/16
  serviceNetwork:
  - 172.30.0.0/16
"#;

    pub fn proxy_request() -> NamespacedName {
        NamespacedName::cluster_scoped(PROXY_NAME)
    }

    pub fn source_request(name: &str) -> NamespacedName {
        NamespacedName::new(ADDITIONAL_TRUST_BUNDLE_NAMESPACE, name)
    }

    pub fn trusted_ca_bundle_identity() -> NamespacedName {
        NamespacedName::new(TRUSTED_CA_BUNDLE_NAMESPACE, TRUSTED_CA_BUNDLE_NAME)
    }

    /// A proxy spec that configures no proxy at all.
    pub fn create_proxy_spec() -> ProxySpec {
        ProxySpec::default()
    }

    pub fn create_proxy_spec_with_trusted_ca(name: &str) -> ProxySpec {
        ProxySpec {
            trusted_ca: Some(TrustedCaReference {
                name: name.to_string(),
            }),
            ..Default::default()
        }
    }

    pub fn create_proxy_spec_with_http_proxy(http_proxy: &str) -> ProxySpec {
        ProxySpec {
            http_proxy: Some(http_proxy.to_string()),
            ..Default::default()
        }
    }

    pub fn create_proxy(spec: ProxySpec) -> Proxy {
        Proxy {
            name: PROXY_NAME.to_string(),
            spec,
            status: Default::default(),
        }
    }

    pub fn create_source_config_map(name: &str, data: &str) -> ConfigMap {
        ConfigMap::new(&source_request(name)).with_data(TRUSTED_CA_KEY, data)
    }

    pub fn create_trusted_ca_bundle_config_map(data: &str, resource_version: &str) -> ConfigMap {
        ConfigMap {
            resource_version: Some(resource_version.to_string()),
            ..ConfigMap::new(&trusted_ca_bundle_identity()).with_data(TRUSTED_CA_KEY, data)
        }
    }

    pub fn create_install_config_map() -> ConfigMap {
        ConfigMap::new(&NamespacedName::new("kube-system", "cluster-config-v1"))
            .with_data("install-config", INSTALL_CONFIG)
    }

    pub fn create_derived_bundle(data: &str) -> DerivedTrustBundle {
        DerivedTrustBundle::new(
            &trusted_ca_bundle_identity(),
            TRUSTED_CA_KEY,
            data.to_string(),
            BundleSource::System,
        )
    }

    /// Cluster facts matching `INSTALL_CONFIG`.
    pub fn create_cluster_facts(platform: &str) -> ClusterFacts {
        ClusterFacts {
            infrastructure: InfrastructureConfig {
                name: "cluster".to_string(),
                api_server_internal_uri: Some("https://api-int.demo.example.com:6443".to_string()),
                platform: Some(platform.to_string()),
            },
            network: NetworkConfig {
                name: "cluster".to_string(),
                cluster_networks: vec!["10.128.0.0/14".to_string()],
                service_networks: vec!["172.30.0.0/16".to_string()],
            },
            machine_networks: vec!["10.0.0.0/16".to_string()],
        }
    }

    pub fn expect_proxy(mock: &mut MockProxyRepository, proxy: Proxy) {
        mock.expect_get()
            .with(eq(PROXY_NAME))
            .returning(move |_| {
                let proxy = proxy.clone();
                Box::pin(async move { Ok(Some(proxy)) })
            });
    }

    pub fn expect_system_bundle(mock: &mut MockTrustStoreRepository, data: &'static str) {
        mock.expect_read_system_bundle()
            .times(1)
            .returning(move || Box::pin(async move { Ok(data.as_bytes().to_vec()) }));
    }

    pub fn expect_healthy(mock: &mut MockHealthReporter) {
        mock.expect_set_degraded().never();
        mock.expect_set_not_degraded()
            .with(eq(StatusComponent::ProxyConfig))
            .times(1)
            .return_const(());
    }

    pub fn expect_degraded(mock: &mut MockHealthReporter, reason: DegradedReason) {
        mock.expect_set_degraded()
            .withf(move |component, actual, _| {
                *component == StatusComponent::ProxyConfig && *actual == reason
            })
            .times(1)
            .return_const(());
        mock.expect_set_not_degraded().never();
    }

    pub mod scenarios {
        use mockall::predicate::eq;

        use crate::domain::{
            common::testing::{MockService, TestServiceBuilder},
            config_map::ports::MockConfigMapRepository,
            proxy::{
                entities::Proxy,
                ports::MockProxyRepository,
                test_helpers::{
                    SYSTEM_CA, USER_CA, create_cluster_facts, create_install_config_map,
                    create_proxy, create_proxy_spec_with_trusted_ca, create_source_config_map,
                    create_trusted_ca_bundle_config_map, expect_healthy, expect_proxy,
                    expect_system_bundle, source_request, trusted_ca_bundle_identity,
                },
            },
        };

        /// Scenario: the proxy references `trusted_ca`, which holds `USER_CA`,
        /// and the derived bundle already exists with `existing_bundle`.
        /// `configure_writes` sets the create/update expectations.
        pub fn trusted_ca_and_existing_bundle<F>(
            trusted_ca: &str,
            existing_bundle: impl Into<String>,
            configure_writes: F,
        ) -> MockService
        where
            F: FnOnce(&mut MockConfigMapRepository),
        {
            let trusted_ca = trusted_ca.to_string();
            let existing_bundle = existing_bundle.into();
            let proxy = create_proxy(create_proxy_spec_with_trusted_ca(&trusted_ca));

            TestServiceBuilder::new()
                .customize_proxy_repository(|mock| expect_proxy(mock, proxy))
                .customize_config_map_repository(move |mock| {
                    let source = trusted_ca.clone();
                    mock.expect_get()
                        .with(eq(source_request(&trusted_ca)))
                        .returning(move |_| {
                            let config_map = create_source_config_map(&source, USER_CA);
                            Box::pin(async move { Ok(Some(config_map)) })
                        });
                    mock.expect_get()
                        .with(eq(trusted_ca_bundle_identity()))
                        .times(1)
                        .returning(move |_| {
                            let config_map =
                                create_trusted_ca_bundle_config_map(&existing_bundle, "1");
                            Box::pin(async move { Ok(Some(config_map)) })
                        });
                    configure_writes(mock);
                })
                .customize_trust_store_repository(|mock| expect_system_bundle(mock, SYSTEM_CA))
                .customize_health_reporter(expect_healthy)
                .build()
        }

        /// Scenario: the derived bundle is up to date and the cluster facts
        /// are readable. `configure_status` sets the status write
        /// expectations.
        pub fn unchanged_bundle_with_cluster_facts<F>(
            proxy: Proxy,
            platform: &str,
            configure_status: F,
        ) -> MockService
        where
            F: FnOnce(&mut MockProxyRepository),
        {
            let facts = create_cluster_facts(platform);
            let infrastructure = facts.infrastructure.clone();
            let network = facts.network.clone();

            TestServiceBuilder::new()
                .customize_proxy_repository(|mock| {
                    expect_proxy(mock, proxy);
                    configure_status(mock);
                })
                .customize_config_map_repository(|mock| {
                    mock.expect_get()
                        .with(eq(trusted_ca_bundle_identity()))
                        .times(1)
                        .returning(|_| {
                            Box::pin(async move {
                                Ok(Some(create_trusted_ca_bundle_config_map(SYSTEM_CA, "1")))
                            })
                        });
                    mock.expect_get()
                        .with(eq(create_install_config_map().identity()))
                        .times(1)
                        .returning(|_| Box::pin(async move { Ok(Some(create_install_config_map())) }));
                    mock.expect_create().never();
                    mock.expect_update().never();
                })
                .customize_trust_store_repository(|mock| expect_system_bundle(mock, SYSTEM_CA))
                .customize_cluster_config_repository(move |mock| {
                    mock.expect_get_infrastructure()
                        .with(eq("cluster"))
                        .times(1)
                        .returning(move |_| {
                            let infrastructure = infrastructure.clone();
                            Box::pin(async move { Ok(Some(infrastructure)) })
                        });
                    mock.expect_get_network()
                        .with(eq("cluster"))
                        .times(1)
                        .returning(move |_| {
                            let network = network.clone();
                            Box::pin(async move { Ok(Some(network)) })
                        });
                })
                .customize_health_reporter(expect_healthy)
                .build()
        }
    }
}
