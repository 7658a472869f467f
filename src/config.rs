use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    fn set(&mut self, value: T, source: ConfigSource) {
        self.value = value;
        self.source = source;
    }
}

/// Sync server configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    /// Address to bind
    pub bind: ConfigValue<String>,
    /// Port to listen on
    pub port: ConfigValue<u16>,
    /// Path of the plan document
    pub document_path: ConfigValue<PathBuf>,
    /// Long-poll timeout in seconds
    pub poll_timeout_secs: ConfigValue<u64>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ServerConfigFile {
    bind: Option<String>,
    port: Option<u16>,
    document_path: Option<PathBuf>,
    poll_timeout_secs: Option<u64>,
}

impl ServerConfig {
    /// Load configuration with priority: env vars > config file > defaults
    ///
    /// `ENDURE_SERVER_CONFIG` selects the file when `config_path` is `None`.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut bind = ConfigValue::new("0.0.0.0".to_string(), ConfigSource::Default);
        let mut port = ConfigValue::new(5000, ConfigSource::Default);
        let mut document_path = ConfigValue::new(
            default_data_dir().join("reminders.txt"),
            ConfigSource::Default,
        );
        let mut poll_timeout_secs = ConfigValue::new(30, ConfigSource::Default);
        let mut config_file = None;

        let path = config_path
            .or_else(|| std::env::var("ENDURE_SERVER_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| default_config_dir().join("server.yaml"));

        if let Some(file) = read_file::<ServerConfigFile>(&path)? {
            config_file = Some(path.clone());

            if let Some(value) = file.bind {
                bind.set(value, ConfigSource::File);
            }
            if let Some(value) = file.port {
                port.set(value, ConfigSource::File);
            }
            if let Some(doc) = file.document_path {
                document_path.set(resolve_relative(&path, doc), ConfigSource::File);
            }
            if let Some(value) = file.poll_timeout_secs {
                poll_timeout_secs.set(value, ConfigSource::File);
            }
        }

        // Apply environment variable overrides
        if let Ok(value) = std::env::var("ENDURE_BIND") {
            bind.set(value, ConfigSource::Environment);
        }
        if let Some(value) = std::env::var("ENDURE_PORT").ok().and_then(|p| p.parse().ok()) {
            port.set(value, ConfigSource::Environment);
        }
        if let Ok(value) = std::env::var("ENDURE_DOCUMENT") {
            document_path.set(PathBuf::from(value), ConfigSource::Environment);
        }
        if let Some(value) = std::env::var("ENDURE_POLL_TIMEOUT")
            .ok()
            .and_then(|p| p.parse().ok())
        {
            poll_timeout_secs.set(value, ConfigSource::Environment);
        }

        Ok(Self {
            bind,
            port,
            document_path,
            poll_timeout_secs,
            config_file,
        })
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs.value)
    }
}

/// CLI configuration
#[derive(Debug, Clone, Serialize)]
pub struct ClientConfig {
    /// Server endpoint used when no URL is given on the command line
    pub server_url: ConfigValue<Option<String>>,
    /// Server's long-poll timeout in seconds
    pub poll_timeout_secs: ConfigValue<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ClientConfigFile {
    server_url: Option<String>,
    poll_timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut server_url = ConfigValue::new(None, ConfigSource::Default);
        let mut poll_timeout_secs = ConfigValue::new(30, ConfigSource::Default);
        let mut config_file = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if let Some(file) = read_file::<ClientConfigFile>(&path)? {
            config_file = Some(path.clone());
            if let Some(url) = file.server_url {
                server_url.set(Some(url), ConfigSource::File);
            }
            if let Some(value) = file.poll_timeout_secs {
                poll_timeout_secs.set(value, ConfigSource::File);
            }
        }

        if let Ok(url) = std::env::var("ENDURE_URL") {
            server_url.set(Some(url), ConfigSource::Environment);
        }
        if let Some(value) = std::env::var("ENDURE_POLL_TIMEOUT")
            .ok()
            .and_then(|p| p.parse().ok())
        {
            poll_timeout_secs.set(value, ConfigSource::Environment);
        }

        Ok(Self {
            server_url,
            poll_timeout_secs,
            config_file,
        })
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs.value)
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        default_config_dir().join("config.yaml")
    }
}

/// Default config directory (platform-specific):
/// - Linux: ~/.config/endure/
/// - macOS: ~/Library/Application Support/endure/
/// - Windows: %APPDATA%/endure/
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("endure")
}

/// Default data directory (platform-specific):
/// - Linux: ~/.local/share/endure/
/// - macOS: ~/Library/Application Support/endure/
/// - Windows: %APPDATA%/endure/
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("endure")
}

fn read_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
    // An empty YAML file deserializes as unit, not as a map.
    if contents.trim().is_empty() {
        return serde_yaml::from_str("{}")
            .map(Some)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e));
    }
    serde_yaml::from_str(&contents)
        .map(Some)
        .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))
}

/// Resolve relative paths against the config file's directory
fn resolve_relative(config_path: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        config_path
            .parent()
            .map(|p| p.join(&path))
            .unwrap_or(path)
    } else {
        path
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
