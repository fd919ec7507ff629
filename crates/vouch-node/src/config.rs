//! Node configuration loading and management.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use vouch_core::ChainLimits;

/// Full configuration for the Vouch node.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VouchConfig {
    /// API server settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Trust-chain walk bounds.
    #[serde(default)]
    pub chain: ChainLimits,

    /// Root issuers.
    #[serde(default)]
    pub trust: TrustConfig,

    /// Where DID Documents and type mappings come from.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// This organization's own public registry.
    #[serde(default)]
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API listen address.
    #[serde(default = "default_api_addr")]
    pub listen_addr: String,
    /// API port.
    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrustConfig {
    /// Issuers trusted without an authorizing credential.
    #[serde(default)]
    pub root_dids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LedgerConfig {
    /// Base URL of a ledger gateway serving `/did/{did}` and `/types/{type}`.
    #[serde(default)]
    pub gateway_url: Option<String>,
    /// JSON file holding an array of DID Documents, consulted before the gateway.
    #[serde(default)]
    pub documents_path: Option<PathBuf>,
    /// Credential type → permission type required to issue it.
    #[serde(default)]
    pub type_permissions: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Path of the registry file served at `GET /registry`.
    #[serde(default = "default_registry_path")]
    pub path: PathBuf,
}

// Default value functions
fn default_api_addr() -> String {
    "127.0.0.1".into()
}
fn default_api_port() -> u16 {
    9100
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}
fn default_registry_path() -> PathBuf {
    PathBuf::from("./data/registry.json")
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_api_addr(),
            port: default_api_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: default_registry_path(),
        }
    }
}

impl VouchConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: VouchConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.chain.validate()?;
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!(
                "logging.format must be \"text\" or \"json\", got {:?}",
                self.logging.format
            );
        }
        if self.trust.root_dids.is_empty() {
            tracing::warn!("no root DIDs configured; no trust chain can be valid");
        }
        Ok(())
    }

    /// Socket address the API server binds to.
    pub fn api_socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.api.listen_addr, self.api.port);
        Ok(addr.parse()?)
    }
}
