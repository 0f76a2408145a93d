use serde::{Deserialize, Serialize};

use super::edge::EdgeConfig;
use super::errors::ConfigError;
use super::logging::{parse_bool_flag, LoggingConfig};
use super::server::ServerConfig;
use super::upstream::{split_url_list, UpstreamConfig};

/// Environment variables recognized by [`Config::apply_env`].
pub const ENV_UPSTREAMS: &str = "TANDEM_DOH_UPSTREAMS";
pub const ENV_UPSTREAM: &str = "TANDEM_DOH_UPSTREAM";
pub const ENV_WORKER_URL: &str = "TANDEM_DOH_WORKER_URL";
pub const ENV_LOG_QUERIES: &str = "TANDEM_DOH_LOG_QUERIES";

/// Which relay hop this process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayTier {
    Edge,
    Worker,
}

impl RelayTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Edge => "edge",
            Self::Worker => "worker",
        }
    }
}

impl std::fmt::Display for RelayTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main configuration structure for Tandem DoH
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Server configuration (port, bind address)
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream resolver configuration (worker tier)
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Worker hop configuration (edge tier)
    #[serde(default)]
    pub edge: EdgeConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. tandem-doh.toml in current directory
    /// 3. /etc/tandem-doh/config.toml
    /// 4. Default configuration
    ///
    /// Environment variables override file values; CLI flags override both.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("tandem-doh.toml").exists() {
            Self::from_file("tandem-doh.toml")?
        } else if std::path::Path::new("/etc/tandem-doh/config.toml").exists() {
            Self::from_file("/etc/tandem-doh/config.toml")?
        } else {
            Self::default()
        };

        config.apply_env(|name| std::env::var(name).ok());
        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply environment overrides through an injected lookup, so tests can
    /// feed values without touching the process environment.
    ///
    /// Blank values never override a file setting; a present but
    /// unrecognized `TANDEM_DOH_LOG_QUERIES` explicitly disables query
    /// logging.
    pub fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = get(ENV_UPSTREAMS) {
            let urls = split_url_list(&raw);
            if !urls.is_empty() {
                self.upstream.urls = urls;
            }
        }
        if let Some(raw) = get(ENV_UPSTREAM) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                self.upstream.url = Some(trimmed.to_string());
            }
        }
        if let Some(raw) = get(ENV_WORKER_URL) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                self.edge.worker_url = Some(trimmed.to_string());
            }
        }
        if let Some(raw) = get(ENV_LOG_QUERIES) {
            self.logging.log_queries = parse_bool_flag(&raw).unwrap_or(false);
        }
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if !overrides.upstreams.is_empty() {
            self.upstream.urls = overrides.upstreams;
        }
        if let Some(worker_url) = overrides.worker_url {
            self.edge.worker_url = Some(worker_url);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.log_queries {
            self.logging.log_queries = true;
        }
    }

    /// Validate configuration for the tier being started
    pub fn validate(&self, tier: RelayTier) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("Port cannot be 0".to_string()));
        }

        if self.upstream.timeout == 0 {
            return Err(ConfigError::Validation(
                "Upstream timeout cannot be 0".to_string(),
            ));
        }

        if tier == RelayTier::Edge && self.edge.worker_query_url().is_none() {
            return Err(ConfigError::Validation(
                "Edge tier requires a worker URL (edge.worker_url or TANDEM_DOH_WORKER_URL)"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub upstreams: Vec<String>,
    pub worker_url: Option<String>,
    pub log_level: Option<String>,
    pub log_queries: bool,
}
