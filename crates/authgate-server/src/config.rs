use std::net::SocketAddr;

use authgate_authorize::{AuthorizeConfig, Client};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub authorize: AuthorizeConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        self.authorize.validate().map_err(|e| e.to_string())?;
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        match lvl.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            _ => return Err(format!("logging.level '{}' is invalid", self.logging.level)),
        }
        // Provider validation
        Url::parse(&self.provider.consent_url)
            .map_err(|e| format!("provider.consent_url is invalid: {e}"))?;
        if self.provider.pending_ttl_secs == 0 {
            return Err("provider.pending_ttl_secs must be > 0".into());
        }
        if self.provider.max_pending == 0 {
            return Err("provider.max_pending must be > 0".into());
        }
        let mut seen = std::collections::HashSet::new();
        for client in &self.provider.clients {
            if client.client_id.is_empty() {
                return Err("provider.clients: client_id must not be empty".into());
            }
            if !seen.insert(client.client_id.as_str()) {
                return Err(format!(
                    "provider.clients: duplicate client_id '{}'",
                    client.client_id
                ));
            }
            if client.redirect_uris.is_empty() {
                return Err(format!(
                    "provider.clients: client '{}' has no redirect_uris",
                    client.client_id
                ));
            }
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::new(host, self.server.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Static client registry and consent page used by the bundled provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Where accepted requests are sent. A `req` parameter identifying the
    /// pending request is appended.
    #[serde(default = "default_consent_url")]
    pub consent_url: String,
    #[serde(default)]
    pub clients: Vec<Client>,
    /// Seconds a pending request waits for the consent page before it is dropped.
    #[serde(default = "default_pending_ttl_secs")]
    pub pending_ttl_secs: u64,
    /// Upper bound on pending requests. New requests are refused with
    /// `temporarily_unavailable` once it is reached.
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,
}

fn default_consent_url() -> String {
    "http://localhost:8080/consent".into()
}

fn default_pending_ttl_secs() -> u64 {
    600
}

fn default_max_pending() -> usize {
    10_000
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            consent_url: default_consent_url(),
            clients: Vec::new(),
            pending_ttl_secs: default_pending_ttl_secs(),
            max_pending: default_max_pending(),
        }
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or("authgate.toml"));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., AUTHGATE__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("AUTHGATE")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}
