//! Configuration loading: defaults, then an optional JSON file, then `SW_*`
//! environment overrides.

use std::collections::HashMap;
use std::path::PathBuf;
use sw_03_report_api::{ApiConfig, ConfigError};
use thiserror::Error;
use tracing::info;

/// Path of the JSON config file.
pub const CONFIG_FILE_VAR: &str = "SW_CONFIG";
pub const HTTP_HOST_VAR: &str = "SW_HTTP_HOST";
pub const HTTP_PORT_VAR: &str = "SW_HTTP_PORT";
pub const REQUIRE_SIGNED_VAR: &str = "SW_REQUIRE_SIGNED_REPORTS";
/// Comma-separated list of allowed CORS origins.
pub const CORS_ORIGINS_VAR: &str = "SW_CORS_ORIGINS";
/// `json` switches log output to JSON lines.
pub const LOG_FORMAT_VAR: &str = "SW_LOG_FORMAT";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid value {value:?} for {name}")]
    InvalidVar { name: &'static str, value: String },

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Where configuration comes from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    pub file: Option<PathBuf>,
    pub vars: HashMap<String, String>,
}

impl ConfigSource {
    /// Snapshot the process environment.
    pub fn from_env() -> Self {
        let vars: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("SW_"))
            .collect();
        Self {
            file: vars.get(CONFIG_FILE_VAR).map(PathBuf::from),
            vars,
        }
    }

    fn var(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, LoadError> {
    value.parse().map_err(|_| LoadError::InvalidVar {
        name,
        value: value.to_string(),
    })
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, LoadError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(LoadError::InvalidVar {
            name,
            value: value.to_string(),
        }),
    }
}

/// Build and validate the API configuration.
pub fn load_config(source: &ConfigSource) -> Result<ApiConfig, LoadError> {
    let mut config = match &source.file {
        Some(path) => {
            let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
                path: path.clone(),
                source,
            })?;
            let config = serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "Loaded configuration file");
            config
        }
        None => ApiConfig::default(),
    };

    if let Some(host) = source.var(HTTP_HOST_VAR) {
        config.http.host = parse_var(HTTP_HOST_VAR, host)?;
    }
    if let Some(port) = source.var(HTTP_PORT_VAR) {
        config.http.port = parse_var(HTTP_PORT_VAR, port)?;
    }
    if let Some(flag) = source.var(REQUIRE_SIGNED_VAR) {
        config.security.require_signed_reports = parse_bool(REQUIRE_SIGNED_VAR, flag)?;
    }
    if let Some(origins) = source.var(CORS_ORIGINS_VAR) {
        config.cors.allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
    }

    config.validate()?;
    Ok(config)
}
