pub mod cluster_config;
pub mod config_map;
pub mod crds;
pub mod health;
pub mod proxy;
pub mod trust_bundle;
