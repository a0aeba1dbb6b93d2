pub mod common;
pub mod config_map;
pub mod error;
pub mod health;
pub mod proxy;
pub mod trust_bundle;
