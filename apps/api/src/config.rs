//! API server configuration.
//!
//! Configuration is loaded from `TABLETOP_*` environment variables with
//! fallback to defaults.
//!
//! | Variable                      | Default              |
//! |-------------------------------|----------------------|
//! | `TABLETOP_PORT`               | `5000`               |
//! | `TABLETOP_BIND_ADDR`          | `0.0.0.0`            |
//! | `TABLETOP_DB_PATH`            | `./tabletop.db`      |
//! | `TABLETOP_TAX_RATE_BPS`       | `500` (5%)           |
//! | `TABLETOP_DB_MAX_CONNECTIONS` | `5`                  |
//! | `TABLETOP_RESTAURANT_NAME`    | `Tabletop Restaurant`|
//! | `TABLETOP_CORS_ORIGINS`       | `*` (any origin)     |
//!
//! `TABLETOP_CORS_ORIGINS` is a comma-separated list such as
//! `http://localhost:5173,https://pos.example.com`.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use axum::http::HeaderValue;
use serde::Serialize;
use tabletop_core::validation::validate_tax_rate_bps;
use tabletop_core::{TaxRate, DEFAULT_TAX_RATE_BPS};

/// API server configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// Interface to bind
    pub bind_addr: IpAddr,

    /// SQLite database file
    pub db_path: PathBuf,

    /// Tax applied to every bill
    pub tax_rate: TaxRate,

    /// Pool size for the SQLite connection pool
    pub db_max_connections: u32,

    /// Shown by the health endpoint
    pub restaurant_name: String,

    /// Origins allowed by CORS. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            port: 5000,
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            db_path: PathBuf::from("./tabletop.db"),
            tax_rate: TaxRate::from_bps(DEFAULT_TAX_RATE_BPS),
            db_max_connections: 5,
            restaurant_name: "Tabletop Restaurant".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup. Unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ApiConfig::default();

        let tax_rate_bps: u32 = parse_or(&lookup, "TABLETOP_TAX_RATE_BPS", DEFAULT_TAX_RATE_BPS)?;
        validate_tax_rate_bps(tax_rate_bps).map_err(|e| ConfigError::OutOfRange {
            key: "TABLETOP_TAX_RATE_BPS".to_string(),
            reason: e.to_string(),
        })?;

        let db_max_connections: u32 = parse_or(
            &lookup,
            "TABLETOP_DB_MAX_CONNECTIONS",
            defaults.db_max_connections,
        )?;
        if db_max_connections == 0 {
            return Err(ConfigError::OutOfRange {
                key: "TABLETOP_DB_MAX_CONNECTIONS".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let restaurant_name = lookup("TABLETOP_RESTAURANT_NAME")
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or(defaults.restaurant_name);

        Ok(ApiConfig {
            port: parse_or(&lookup, "TABLETOP_PORT", defaults.port)?,
            bind_addr: parse_or(&lookup, "TABLETOP_BIND_ADDR", defaults.bind_addr)?,
            db_path: lookup("TABLETOP_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            tax_rate: TaxRate::from_bps(tax_rate_bps),
            db_max_connections,
            restaurant_name,
            cors_origins: parse_origins(lookup("TABLETOP_CORS_ORIGINS"))?,
        })
    }

    /// Address the HTTP listener binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
    }
}

/// Unset, blank or `*` means any origin.
fn parse_origins(raw: Option<String>) -> Result<Vec<String>, ConfigError> {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() && raw.trim() != "*" => raw,
        _ => return Ok(Vec::new()),
    };

    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| match HeaderValue::from_str(origin) {
            Ok(_) if origin != "*" => Ok(origin.to_string()),
            _ => Err(ConfigError::InvalidValue {
                key: "TABLETOP_CORS_ORIGINS".to_string(),
                value: origin.to_string(),
            }),
        })
        .collect()
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("{key} out of range: {reason}")]
    OutOfRange { key: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.tax_rate.bps(), 500);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.db_path, PathBuf::from("./tabletop.db"));
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:5000");
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("TABLETOP_PORT", "8080"),
            ("TABLETOP_BIND_ADDR", "127.0.0.1"),
            ("TABLETOP_DB_PATH", "/var/lib/tabletop/pos.db"),
            ("TABLETOP_TAX_RATE_BPS", "1800"),
            ("TABLETOP_DB_MAX_CONNECTIONS", "8"),
            ("TABLETOP_RESTAURANT_NAME", "Spice Route"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.db_path, PathBuf::from("/var/lib/tabletop/pos.db"));
        assert_eq!(config.tax_rate.bps(), 1800);
        assert_eq!(config.db_max_connections, 8);
        assert_eq!(config.restaurant_name, "Spice Route");
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("TABLETOP_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "TABLETOP_PORT"));
    }

    #[test]
    fn test_tax_rate_out_of_range() {
        let err = load(&[("TABLETOP_TAX_RATE_BPS", "10001")]).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));

        let err = load(&[("TABLETOP_TAX_RATE_BPS", "-5")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_zero_pool_size_rejected() {
        assert!(load(&[("TABLETOP_DB_MAX_CONNECTIONS", "0")]).is_err());
    }

    #[test]
    fn test_blank_restaurant_name_uses_default() {
        let config = load(&[("TABLETOP_RESTAURANT_NAME", "   ")]).unwrap();
        assert_eq!(config.restaurant_name, "Tabletop Restaurant");
    }

    #[test]
    fn test_cors_origins() {
        let config = load(&[(
            "TABLETOP_CORS_ORIGINS",
            "http://localhost:5173, https://pos.example.com,",
        )])
        .unwrap();
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:5173", "https://pos.example.com"]
        );

        for any in ["*", "  "] {
            let config = load(&[("TABLETOP_CORS_ORIGINS", any)]).unwrap();
            assert!(config.cors_origins.is_empty());
        }

        let err = load(&[("TABLETOP_CORS_ORIGINS", "http://ok.test,bad\norigin")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "TABLETOP_CORS_ORIGINS"));

        let err = load(&[("TABLETOP_CORS_ORIGINS", "http://ok.test,*")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
