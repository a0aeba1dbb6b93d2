use std::net::IpAddr;

use thiserror::Error;
use url::Url;

use crate::domain::proxy::entities::ProxySpec;

const HTTP_SCHEME: &str = "http";
const HTTPS_SCHEME: &str = "https";
const NO_PROXY_WILDCARD: &str = "*";
const MAX_DOMAIN_LENGTH: usize = 253;
const MAX_LABEL_LENGTH: usize = 63;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProxyConfigError {
    #[error("{field} is set but empty")]
    EmptyValue { field: &'static str },

    #[error("invalid {field} URI '{value}': {reason}")]
    InvalidUri {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field} '{value}' requires a {expected} URI scheme")]
    UnsupportedScheme {
        field: &'static str,
        value: String,
        expected: String,
    },

    #[error("invalid noProxy entry '{entry}'")]
    InvalidNoProxy { entry: String },
}

/// Checks the URL-like fields of a proxy spec. A spec without httpProxy,
/// httpsProxy and noProxy describes a cluster without a proxy and is not
/// checked at all.
pub fn validate_proxy_spec(spec: &ProxySpec) -> Result<(), ProxyConfigError> {
    if !spec.is_proxy_configured() {
        return Ok(());
    }

    if let Some(http_proxy) = &spec.http_proxy {
        validate_uri("httpProxy", http_proxy, &[HTTP_SCHEME])?;
    }

    if let Some(https_proxy) = &spec.https_proxy {
        validate_uri("httpsProxy", https_proxy, &[HTTP_SCHEME, HTTPS_SCHEME])?;
    }

    if let Some(no_proxy) = &spec.no_proxy {
        validate_no_proxy(no_proxy)?;
    }

    for endpoint in &spec.readiness_endpoints {
        validate_uri("readinessEndpoints", endpoint, &[HTTP_SCHEME, HTTPS_SCHEME])?;
    }

    Ok(())
}

fn validate_uri(
    field: &'static str,
    value: &str,
    allowed_schemes: &[&str],
) -> Result<(), ProxyConfigError> {
    if value.trim().is_empty() {
        return Err(ProxyConfigError::EmptyValue { field });
    }

    let url = Url::parse(value).map_err(|e| ProxyConfigError::InvalidUri {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })?;

    if url.host_str().is_none_or(str::is_empty) {
        return Err(ProxyConfigError::InvalidUri {
            field,
            value: value.to_string(),
            reason: "missing host".to_string(),
        });
    }

    if !allowed_schemes.contains(&url.scheme()) {
        return Err(ProxyConfigError::UnsupportedScheme {
            field,
            value: value.to_string(),
            expected: allowed_schemes
                .iter()
                .map(|scheme| format!("'{scheme}'"))
                .collect::<Vec<_>>()
                .join(" or "),
        });
    }

    Ok(())
}

fn validate_no_proxy(no_proxy: &str) -> Result<(), ProxyConfigError> {
    if no_proxy.trim().is_empty() {
        return Err(ProxyConfigError::EmptyValue { field: "noProxy" });
    }

    if no_proxy.trim() == NO_PROXY_WILDCARD {
        return Ok(());
    }

    for entry in no_proxy.split(',').map(str::trim) {
        if !is_ip_or_cidr(entry) && !is_domain_name(entry) {
            return Err(ProxyConfigError::InvalidNoProxy {
                entry: entry.to_string(),
            });
        }
    }

    Ok(())
}

fn is_ip_or_cidr(entry: &str) -> bool {
    match entry.split_once('/') {
        None => entry.parse::<IpAddr>().is_ok(),
        Some((address, prefix)) => match (address.parse::<IpAddr>(), prefix.parse::<u8>()) {
            (Ok(IpAddr::V4(_)), Ok(prefix)) => prefix <= 32,
            (Ok(IpAddr::V6(_)), Ok(prefix)) => prefix <= 128,
            _ => false,
        },
    }
}

/// A DNS name, optionally prefixed with `.` to match every subdomain.
fn is_domain_name(entry: &str) -> bool {
    let domain = entry.strip_prefix('.').unwrap_or(entry);

    !domain.is_empty() && domain.len() <= MAX_DOMAIN_LENGTH && domain.split('.').all(is_dns_label)
}

fn is_dns_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LENGTH
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}
