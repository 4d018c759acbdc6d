//! Configuration for the registration server.

use anyhow::{Context, Result};
use secrecy::{ExposeSecret, Secret, SecretString};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// PIN used when none is configured. Startup warns about it.
pub const DEFAULT_ADMIN_PIN: &str = "1234";

/// Server configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Administrator access configuration
    #[serde(default)]
    pub admin: AdminConfig,

    /// Registration storage configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body; signatures travel inline
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

#[derive(Debug, Deserialize)]
pub struct AdminConfig {
    /// Shared PIN checked against the Basic auth password
    #[serde(default = "default_admin_pin")]
    pub pin: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the JSON registrations file
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// Enable persistence (if false, registrations live in memory only)
    #[serde(default = "default_true")]
    pub persist: bool,

    /// Quiet period before pending changes are written
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            pin: default_admin_pin(),
        }
    }
}

impl AdminConfig {
    /// True when the PIN was never changed from the shipped default.
    pub fn uses_default_pin(&self) -> bool {
        self.pin.expose_secret() == DEFAULT_ADMIN_PIN
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            persist: true,
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl StoreConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3000
}

fn default_body_limit() -> usize {
    12 * 1024 * 1024
}

fn default_admin_pin() -> SecretString {
    Secret::new(DEFAULT_ADMIN_PIN.to_string())
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/registrations.json")
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    200
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Nested keys use `__` (`SERVER__PORT`, `ADMIN__PIN`). The flat `PORT`
    /// and `ADMIN_PIN` variables are honored as fallbacks.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Ok(port) = std::env::var("PORT") {
            builder = builder
                .set_default("server.port", port)
                .context("Invalid PORT")?;
        }
        if let Ok(pin) = std::env::var("ADMIN_PIN") {
            builder = builder
                .set_default("admin.pin", pin)
                .context("Invalid ADMIN_PIN")?;
        }

        let config = builder
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.listen_addr, "0.0.0.0");
        assert_eq!(config.server.body_limit_bytes, 12 * 1024 * 1024);
        assert_eq!(config.store.path, PathBuf::from("data/registrations.json"));
        assert!(config.store.persist);
        assert_eq!(config.store.debounce(), Duration::from_millis(200));
        assert_eq!(config.log.level, "info");
        assert!(config.admin.uses_default_pin());
    }

    #[test]
    fn test_custom_pin_is_not_default() {
        let admin = AdminConfig {
            pin: Secret::new("9876".to_string()),
        };
        assert!(!admin.uses_default_pin());
    }

    #[test]
    fn test_pin_is_redacted_in_debug() {
        let admin = AdminConfig {
            pin: Secret::new("9876".to_string()),
        };
        assert!(!format!("{:?}", admin).contains("9876"));
    }
}
