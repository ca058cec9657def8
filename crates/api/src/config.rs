//! Application configuration loaded from environment variables.

use catalog_store::InventoryLayout;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "test" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3001`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT` — `text` or `json` (default: `text`)
/// - `APP_ENV` — `development` or `production` (default: `development`)
/// - `CLIENT_URL` — allowed CORS origin (default: `"http://localhost:5173"`)
/// - `DATABASE_URL` — PostgreSQL URL; in-memory stores are used when unset
/// - `INVENTORY_LAYOUT` — `document` or `collection` (default: `collection`)
/// - `DATABASE_MAX_CONNECTIONS` — pool size (default: `5`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub environment: Environment,
    pub client_url: String,
    pub database_url: Option<String>,
    pub inventory_layout: InventoryLayout,
    pub database_max_connections: u32,
    /// Variables that were set but could not be parsed; defaults were used.
    pub invalid_vars: Vec<String>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let mut invalid_vars = Vec::new();

        let parsed = |key: &str| -> Option<String> {
            lookup(key).filter(|value| !value.trim().is_empty())
        };

        let port = parse_or(&parsed, &mut invalid_vars, "PORT", defaults.port);
        let log_format = parse_or(
            &parsed,
            &mut invalid_vars,
            "LOG_FORMAT",
            defaults.log_format,
        );
        let environment = parse_or(
            &parsed,
            &mut invalid_vars,
            "APP_ENV",
            defaults.environment,
        );
        let inventory_layout = parse_or(
            &parsed,
            &mut invalid_vars,
            "INVENTORY_LAYOUT",
            defaults.inventory_layout,
        );
        let database_max_connections = parse_or(
            &parsed,
            &mut invalid_vars,
            "DATABASE_MAX_CONNECTIONS",
            defaults.database_max_connections,
        );

        Self {
            host: parsed("HOST").unwrap_or(defaults.host),
            port,
            log_level: parsed("RUST_LOG").unwrap_or(defaults.log_level),
            log_format,
            environment,
            client_url: parsed("CLIENT_URL").unwrap_or(defaults.client_url),
            database_url: parsed("DATABASE_URL"),
            inventory_layout,
            database_max_connections,
            invalid_vars,
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether error responses should carry the error's source chain.
    pub fn exposes_error_details(&self) -> bool {
        self.environment != Environment::Production
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    invalid_vars: &mut Vec<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            invalid_vars.push(key.to_string());
            default
        }),
        None => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            environment: Environment::Development,
            client_url: "http://localhost:5173".to_string(),
            database_url: None,
            inventory_layout: InventoryLayout::Collection,
            database_max_connections: 5,
            invalid_vars: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3001);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.client_url, "http://localhost:5173");
        assert!(config.database_url.is_none());
        assert!(config.exposes_error_details());
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_lookup_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("APP_ENV", "production"),
            ("LOG_FORMAT", "json"),
            ("DATABASE_URL", "postgres://localhost/store"),
            ("INVENTORY_LAYOUT", "document"),
            ("RUST_LOG", "api=debug,tower_http=info"),
        ]);
        assert_eq!(config.log_level, "api=debug,tower_http=info");
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, Environment::Production);
        assert!(!config.exposes_error_details());
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/store")
        );
        assert_eq!(config.inventory_layout, InventoryLayout::Document);
        assert!(config.invalid_vars.is_empty());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[("PORT", "not-a-port"), ("INVENTORY_LAYOUT", "table")]);
        assert_eq!(config.port, 3001);
        assert_eq!(config.inventory_layout, InventoryLayout::Collection);
        assert_eq!(config.invalid_vars, vec!["PORT", "INVENTORY_LAYOUT"]);
    }

    #[test]
    fn test_blank_database_url_means_in_memory() {
        let config = config_from(&[("DATABASE_URL", "  ")]);
        assert!(config.database_url.is_none());
    }
}
