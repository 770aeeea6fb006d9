//! HTTP server configuration.

use serde::{Deserialize, Serialize};
use superhero_core::StoreConfig;

pub const ENV_HOST: &str = "SUPERHEROES_HOST";
pub const ENV_PORT: &str = "SUPERHEROES_PORT";

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Datastore, asset and log locations
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            store: StoreConfig::default(),
        }
    }
}

impl HttpServerConfig {
    /// Builds a config from defaults overlaid with `SUPERHEROES_*` variables.
    ///
    /// An unparsable port falls back to the default.
    pub fn from_env() -> Self {
        let mut config = Self {
            store: StoreConfig::from_env(),
            ..Self::default()
        };
        if let Ok(host) = std::env::var(ENV_HOST) {
            if !host.trim().is_empty() {
                config.host = host.trim().to_string();
            }
        }
        if let Some(port) = std::env::var(ENV_PORT)
            .ok()
            .and_then(|value| value.trim().parse().ok())
        {
            config.port = port;
        }
        config
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
