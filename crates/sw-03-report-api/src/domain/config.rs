//! Report API configuration with validation.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

/// Main API configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Request and paging limits
    pub limits: LimitsConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Authorship enforcement
    pub security: SecurityConfig,
}

impl ApiConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_request_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_request_size cannot be 0".into(),
            ));
        }

        if self.limits.default_page_size == 0 || self.limits.max_page_size == 0 {
            return Err(ConfigError::InvalidLimit("page sizes cannot be 0".into()));
        }

        if self.limits.default_page_size > self.limits.max_page_size {
            return Err(ConfigError::InvalidLimit(format!(
                "default_page_size {} exceeds max_page_size {}",
                self.limits.default_page_size, self.limits.max_page_size
            )));
        }

        if self.limits.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidLimit(
                "request_timeout_secs cannot be 0".into(),
            ));
        }

        if self.cors.enabled && self.cors.allowed_origins.is_empty() {
            return Err(ConfigError::Invalid(
                "cors.allowed_origins cannot be empty when CORS is enabled".into(),
            ));
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 3000)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3000,
        }
    }
}

/// Request validation limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max request body size in bytes (default: 64KB)
    pub max_request_size: usize,
    /// Page size used when `limit` is absent
    pub default_page_size: u32,
    /// Upper bound for `limit`
    pub max_page_size: u32,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_size: 64 * 1024,
            default_page_size: 20,
            max_page_size: 100,
            request_timeout_secs: 30,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins ("*" for all)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: ["GET", "POST", "PATCH", "DELETE", "OPTIONS"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            allowed_headers: vec!["Content-Type".to_string()],
            max_age: 86400, // 24 hours
        }
    }
}

/// Authorship enforcement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Reject submissions that carry no wallet signature
    pub require_signed_reports: bool,
}

/// Configuration errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.http_addr().port(), 3000);
        assert_eq!(config.limits.default_page_size, 20);
        assert_eq!(config.limits.max_page_size, 100);
        assert!(!config.security.require_signed_reports);
    }

    #[test]
    fn test_page_size_validation() {
        let mut config = ApiConfig::default();
        config.limits.default_page_size = 500;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLimit(_))
        ));

        let mut config = ApiConfig::default();
        config.limits.max_page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ApiConfig =
            serde_json::from_str(r#"{ "http": { "port": 8080 }, "security": { "require_signed_reports": true } }"#)
                .unwrap();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.limits.max_page_size, 100);
        assert!(config.security.require_signed_reports);
    }
}
