//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::render::{DEFAULT_BAR_COLOR, DEFAULT_LINE_COLOR, FALLBACK_PALETTE};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub sanitizer: SanitizerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Upstream reports data source
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the reports API
    #[serde(default = "default_source_url")]
    pub url: String,

    /// Path of the reports endpoint, appended to `url`
    #[serde(default = "default_reports_path")]
    pub reports_path: String,

    /// Static bearer token attached to upstream requests
    #[serde(default)]
    pub auth_token: Option<String>,

    #[serde(default = "default_source_timeout")]
    pub timeout_ms: u64,

    /// Read items from this JSON file instead of the HTTP API
    #[serde(default)]
    pub file: Option<String>,
}

fn default_source_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_reports_path() -> String {
    "/api/reports".to_string()
}

fn default_source_timeout() -> u64 {
    10_000
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            reports_path: default_reports_path(),
            auth_token: None,
            timeout_ms: default_source_timeout(),
            file: None,
        }
    }
}

impl SourceConfig {
    /// Full URL of the reports endpoint
    pub fn reports_url(&self) -> String {
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            self.reports_path.trim_start_matches('/')
        )
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Fetch reports once when the server starts
    #[serde(default = "default_refresh_on_start")]
    pub refresh_on_start: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_request_timeout() -> u64 {
    30
}

fn default_refresh_on_start() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![
                "http://localhost:4200".to_string(),
                "http://127.0.0.1:4200".to_string(),
            ],
            request_timeout_secs: default_request_timeout(),
            refresh_on_start: default_refresh_on_start(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Chart rendering options
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Bar fill when the chart spec has no colors
    #[serde(default = "default_bar_color")]
    pub bar_color: String,

    /// Line stroke when the chart spec has no colors
    #[serde(default = "default_line_color")]
    pub line_color: String,

    /// Pie wedge colors used past the end of a chart's `colors`
    #[serde(default = "default_palette")]
    pub fallback_palette: Vec<String>,
}

fn default_bar_color() -> String {
    DEFAULT_BAR_COLOR.to_string()
}

fn default_line_color() -> String {
    DEFAULT_LINE_COLOR.to_string()
}

fn default_palette() -> Vec<String> {
    FALLBACK_PALETTE.iter().map(|c| c.to_string()).collect()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            bar_color: default_bar_color(),
            line_color: default_line_color(),
            fallback_palette: default_palette(),
        }
    }
}

/// HTML sanitizer options
#[derive(Debug, Clone, Deserialize)]
pub struct SanitizerConfig {
    /// Tags allowed on top of ammonia's defaults
    #[serde(default)]
    pub extra_tags: Vec<String>,

    /// `rel` attribute forced onto links
    #[serde(default = "default_link_rel")]
    pub link_rel: Option<String>,

    #[serde(default = "default_strip_comments")]
    pub strip_comments: bool,
}

fn default_link_rel() -> Option<String> {
    Some("noopener noreferrer".to_string())
}

fn default_strip_comments() -> bool {
    true
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            extra_tags: Vec::new(),
            link_rel: default_link_rel(),
            strip_comments: default_strip_comments(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config = Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings under which every request would fail
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "source.timeout_ms",
                reason: "must be greater than zero",
            });
        }
        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "api.request_timeout_secs",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("reportview").join("config.toml")),
            Some(PathBuf::from("/etc/reportview/config.toml")),
            Some(PathBuf::from("./reportview.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Source overrides
        if let Ok(url) = std::env::var("REPORTVIEW_SOURCE_URL") {
            self.source.url = url;
        }
        if let Ok(path) = std::env::var("REPORTVIEW_REPORTS_PATH") {
            self.source.reports_path = path;
        }
        if let Ok(token) = std::env::var("REPORTVIEW_SOURCE_TOKEN") {
            self.source.auth_token = Some(token).filter(|t| !t.is_empty());
        }
        if let Ok(file) = std::env::var("REPORTVIEW_SOURCE_FILE") {
            self.source.file = Some(file).filter(|f| !f.is_empty());
        }

        // API overrides
        if let Ok(host) = std::env::var("REPORTVIEW_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("REPORTVIEW_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("REPORTVIEW_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("REPORTVIEW_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid config value {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r##"# Reportview Configuration
#
# Environment variables override these settings:
# - REPORTVIEW_SOURCE_URL
# - REPORTVIEW_REPORTS_PATH
# - REPORTVIEW_SOURCE_TOKEN
# - REPORTVIEW_SOURCE_FILE
# - REPORTVIEW_API_HOST
# - REPORTVIEW_API_PORT
# - REPORTVIEW_LOG_LEVEL
# - REPORTVIEW_LOG_FORMAT

[source]
# Upstream reports API
url = "http://localhost:8000"
reports_path = "/api/reports"

# Optional static bearer token
# auth_token = ""

# Upstream request timeout in milliseconds
timeout_ms = 10000

# Read items from a local JSON file instead of the API
# file = "./reports.json"

[api]
host = "0.0.0.0"
port = 8090
cors_origins = ["http://localhost:4200", "http://127.0.0.1:4200"]
request_timeout_secs = 30

# Fetch reports once at startup
refresh_on_start = true

[render]
bar_color = "#4CAF50"
line_color = "#2196F3"

# Pie wedge colors used when a chart lists fewer colors than values
fallback_palette = ["#FF9800", "#4CAF50", "#2196F3", "#9C27B0", "#F44336", "#00BCD4"]

[sanitizer]
# Tags allowed in addition to the safe defaults
extra_tags = []
link_rel = "noopener noreferrer"
strip_comments = true

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"##
    .to_string()
}
