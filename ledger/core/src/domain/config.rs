// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0

// Ledger Configuration Types
//
// Defines the configuration schema for an explore service node:
// - Storage backend selection (in-memory or PostgreSQL)
// - gRPC listener and request deadline
// - Logging level and format

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::repository::{PostgresConfig, StorageBackend};

/// Top-level configuration document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackendKind {
    InMemory,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackendKind,

    /// PostgreSQL connection URL (required for the postgres backend)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    /// How long startup retries an unreachable database
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_grpc_port")]
    pub grpc_port: u16,

    /// Upper bound on any single ledger operation
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_backend() -> StorageBackendKind {
    StorageBackendKind::InMemory
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_grpc_port() -> u16 {
    9001
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            database_url: None,
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            grpc_port: default_grpc_port(),
            request_timeout_ms: default_request_timeout_ms(),
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

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.grpc_port)
    }
}

impl LedgerConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. EXPLORE_CONFIG_PATH environment variable
    /// 2. ./explore-config.yaml (working directory)
    /// 3. ~/.explore/config.yaml (user home)
    /// 4. /etc/explore/config.yaml (system, Unix)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("EXPLORE_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./explore-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".explore").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        {
            let system_config = PathBuf::from("/etc/explore/config.yaml");
            if system_config.exists() {
                return Some(system_config);
            }
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    /// This allows container deployments to override config via env vars
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("EXPLORE_STORAGE_BACKEND") {
            match val.to_lowercase().as_str() {
                "postgres" | "postgresql" => {
                    tracing::info!("Environment override: EXPLORE_STORAGE_BACKEND=postgres");
                    self.storage.backend = StorageBackendKind::Postgres;
                }
                "in-memory" | "memory" => {
                    tracing::info!("Environment override: EXPLORE_STORAGE_BACKEND=in-memory");
                    self.storage.backend = StorageBackendKind::InMemory;
                }
                _ => {
                    tracing::warn!(
                        "Invalid value for EXPLORE_STORAGE_BACKEND: '{}'. Expected postgres/in-memory. Ignoring.",
                        val
                    );
                }
            }
        }

        if let Ok(url) = std::env::var("EXPLORE_DATABASE_URL") {
            if !url.is_empty() {
                tracing::info!("Environment override: EXPLORE_DATABASE_URL");
                self.storage.database_url = Some(url);
            }
        }

        if let Ok(val) = std::env::var("EXPLORE_GRPC_PORT") {
            match val.parse::<u16>() {
                Ok(port) => {
                    tracing::info!("Environment override: EXPLORE_GRPC_PORT={}", port);
                    self.server.grpc_port = port;
                }
                Err(_) => tracing::warn!("Invalid value for EXPLORE_GRPC_PORT: '{}'. Ignoring.", val),
            }
        }

        if let Ok(val) = std::env::var("EXPLORE_REQUEST_TIMEOUT_MS") {
            match val.parse::<u64>() {
                Ok(ms) => {
                    tracing::info!("Environment override: EXPLORE_REQUEST_TIMEOUT_MS={}", ms);
                    self.server.request_timeout_ms = ms;
                }
                Err(_) => tracing::warn!(
                    "Invalid value for EXPLORE_REQUEST_TIMEOUT_MS: '{}'. Ignoring.",
                    val
                ),
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.storage.backend == StorageBackendKind::Postgres {
            match &self.storage.database_url {
                Some(url) if !url.is_empty() => {}
                _ => anyhow::bail!("storage.database_url is required for the postgres backend"),
            }
        }

        if self.server.bind_address.is_empty() {
            anyhow::bail!("server.bind_address cannot be empty");
        }

        if self.server.request_timeout_ms == 0 {
            anyhow::bail!("server.request_timeout_ms must be greater than zero");
        }

        match self.logging.format.as_str() {
            "compact" | "json" => {}
            other => anyhow::bail!("Invalid logging.format: '{}'. Must be 'compact' or 'json'", other),
        }

        Ok(())
    }

    /// Storage backend as understood by the repository factory
    pub fn storage_backend(&self) -> StorageBackend {
        match self.storage.backend {
            StorageBackendKind::InMemory => StorageBackend::InMemory,
            StorageBackendKind::Postgres => StorageBackend::PostgreSQL(PostgresConfig {
                connection_string: self.storage.database_url.clone().unwrap_or_default(),
                connect_timeout: Duration::from_secs(self.storage.connect_timeout_secs),
            }),
        }
    }
}
