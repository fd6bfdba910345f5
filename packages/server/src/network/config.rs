//! Network and upstream configuration for the skip-hire server.

use std::time::Duration;

use crate::catalog::http::DEFAULT_BASE_URL;

/// Top-level network configuration for the server.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Bind address for the server.
    pub host: String,
    /// Port to listen on. 0 means OS-assigned.
    pub port: u16,
    /// Allowed CORS origins.
    pub cors_origins: Vec<String>,
    /// Maximum time to wait for a request to complete.
    pub request_timeout: Duration,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Configuration for the upstream skip catalog API.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the supplier API.
    pub base_url: String,
    /// Maximum time to wait for an upstream response.
    pub request_timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_config_defaults() {
        let config = NetworkConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 0);
        assert_eq!(config.cors_origins, vec!["*"]);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_body_bytes, 64 * 1024);
    }

    #[test]
    fn catalog_config_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.base_url, "https://app.wewantwaste.co.uk");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }
}
