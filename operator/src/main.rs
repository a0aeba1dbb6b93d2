use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use trust_bundle_operator::{
    application::{OperatorApp, args::Args},
    domain::common::{Environment, OperatorConfig},
};

fn init_tracing(env: Environment, log_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter));
    let registry = tracing_subscriber::registry().with(filter);

    match env {
        Environment::Production => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        Environment::Development | Environment::Test => {
            registry.with(tracing_subscriber::fmt::layer()).init()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let log_filter = args.log_filter.clone();
    let config = OperatorConfig::from(args);

    init_tracing(config.env, &log_filter);

    // kube and the certificate checks share the process-wide rustls provider.
    let _ = rustls::crypto::ring::default_provider().install_default();

    info!(
        proxy = %config.proxy,
        trusted_ca_bundle = %config.trusted_ca_bundle,
        system_trust_bundle_path = %config.system_trust_bundle_path.display(),
        "starting trust-bundle-operator v{}",
        env!("CARGO_PKG_VERSION")
    );

    OperatorApp::run(config)
        .await
        .context("trust-bundle-operator failed")?;

    Ok(())
}
