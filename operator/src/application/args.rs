use std::{path::PathBuf, time::Duration};

use clap::{Args as ClapArgs, Parser, ValueEnum};

use crate::domain::common::{
    ADDITIONAL_TRUST_BUNDLE_NAMESPACE, CLUSTER_CONFIG_NAME, Environment, INSTALL_CONFIG_KEY,
    INSTALL_CONFIG_NAME, INSTALL_CONFIG_NAMESPACE, OperatorConfig, PROXY_NAME,
    SYSTEM_TRUST_BUNDLE_PATH, TRUSTED_CA_BUNDLE_KEY, TRUSTED_CA_BUNDLE_NAME,
    TRUSTED_CA_BUNDLE_NAMESPACE, entities::NamespacedName,
};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "trust-bundle-operator",
    about = "Converges the cluster proxy configuration into a trusted CA bundle"
)]
pub struct Args {
    #[arg(long, env = "OPERATOR_ENV", value_enum, default_value_t = AppEnv::Development)]
    pub env: AppEnv,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, env = "LOG_FILTER", default_value = "info")]
    pub log_filter: String,

    #[arg(long, env = "PROXY_NAME", default_value = PROXY_NAME)]
    pub proxy_name: String,

    #[arg(long, env = "CLUSTER_CONFIG_NAME", default_value = CLUSTER_CONFIG_NAME)]
    pub cluster_config_name: String,

    /// Seconds before a failed reconciliation is retried.
    #[arg(long, env = "RETRY_INTERVAL_SECS", default_value_t = 30)]
    pub retry_interval_secs: u64,

    #[command(flatten)]
    pub trust_bundle: TrustBundleArgs,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct TrustBundleArgs {
    #[arg(
        long,
        env = "ADDITIONAL_TRUST_BUNDLE_NAMESPACE",
        default_value = ADDITIONAL_TRUST_BUNDLE_NAMESPACE
    )]
    pub additional_trust_bundle_namespace: String,

    #[arg(long, env = "TRUSTED_CA_BUNDLE_NAMESPACE", default_value = TRUSTED_CA_BUNDLE_NAMESPACE)]
    pub trusted_ca_bundle_namespace: String,

    #[arg(long, env = "TRUSTED_CA_BUNDLE_NAME", default_value = TRUSTED_CA_BUNDLE_NAME)]
    pub trusted_ca_bundle_name: String,

    #[arg(long, env = "TRUSTED_CA_BUNDLE_KEY", default_value = TRUSTED_CA_BUNDLE_KEY)]
    pub trusted_ca_bundle_key: String,

    #[arg(long, env = "INSTALL_CONFIG_NAMESPACE", default_value = INSTALL_CONFIG_NAMESPACE)]
    pub install_config_namespace: String,

    #[arg(long, env = "INSTALL_CONFIG_NAME", default_value = INSTALL_CONFIG_NAME)]
    pub install_config_name: String,

    #[arg(long, env = "INSTALL_CONFIG_KEY", default_value = INSTALL_CONFIG_KEY)]
    pub install_config_key: String,

    #[arg(long, env = "SYSTEM_TRUST_BUNDLE_PATH", default_value = SYSTEM_TRUST_BUNDLE_PATH)]
    pub system_trust_bundle_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AppEnv {
    Test,
    Development,
    Production,
}

impl From<AppEnv> for Environment {
    fn from(env: AppEnv) -> Self {
        match env {
            AppEnv::Test => Environment::Test,
            AppEnv::Development => Environment::Development,
            AppEnv::Production => Environment::Production,
        }
    }
}

impl From<Args> for OperatorConfig {
    fn from(args: Args) -> Self {
        let trust_bundle = args.trust_bundle;

        OperatorConfig {
            env: args.env.into(),
            proxy: NamespacedName::cluster_scoped(args.proxy_name),
            additional_trust_bundle_namespace: trust_bundle.additional_trust_bundle_namespace,
            trusted_ca_bundle: NamespacedName::new(
                trust_bundle.trusted_ca_bundle_namespace,
                trust_bundle.trusted_ca_bundle_name,
            ),
            trusted_ca_bundle_key: trust_bundle.trusted_ca_bundle_key,
            cluster_config_name: args.cluster_config_name,
            install_config: NamespacedName::new(
                trust_bundle.install_config_namespace,
                trust_bundle.install_config_name,
            ),
            install_config_key: trust_bundle.install_config_key,
            system_trust_bundle_path: trust_bundle.system_trust_bundle_path,
            retry_interval: Duration::from_secs(args.retry_interval_secs),
        }
    }
}
