//! Runtime configuration for the webhook binary.
//!
//! All settings have in-cluster defaults and can be overridden through
//! environment variables:
//! - `WEBHOOK_CERT_PATH` / `WEBHOOK_KEY_PATH` - TLS certificate and key (PEM)
//! - `WEBHOOK_PORT` - admission webhook port
//! - `HEALTH_PORT` - probes and metrics port

use std::path::PathBuf;

use thiserror::Error;

/// Default path to webhook TLS certificate
pub const WEBHOOK_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";
/// Default path to webhook TLS private key
pub const WEBHOOK_KEY_PATH: &str = "/etc/webhook/certs/tls.key";
/// Default webhook server port
pub const WEBHOOK_PORT: u16 = 9443;
/// Default health server port
pub const HEALTH_PORT: u16 = 8080;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a port number, got '{value}'")]
    InvalidPort { name: &'static str, value: String },
}

/// Webhook binary configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
    pub port: u16,
    pub health_port: u16,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            cert_path: PathBuf::from(WEBHOOK_CERT_PATH),
            key_path: PathBuf::from(WEBHOOK_KEY_PATH),
            port: WEBHOOK_PORT,
            health_port: HEALTH_PORT,
        }
    }
}

impl WebhookConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            cert_path: lookup("WEBHOOK_CERT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.cert_path),
            key_path: lookup("WEBHOOK_KEY_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.key_path),
            port: parse_port("WEBHOOK_PORT", lookup("WEBHOOK_PORT"))?.unwrap_or(defaults.port),
            health_port: parse_port("HEALTH_PORT", lookup("HEALTH_PORT"))?
                .unwrap_or(defaults.health_port),
        })
    }

    /// Whether both TLS files exist, which is required to serve admission requests
    pub fn tls_available(&self) -> bool {
        self.cert_path.exists() && self.key_path.exists()
    }
}

fn parse_port(name: &'static str, value: Option<String>) -> Result<Option<u16>, ConfigError> {
    value
        .map(|v| {
            v.trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { name, value: v })
        })
        .transpose()
}
