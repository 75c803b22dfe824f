//! Configuration types for media-jobs

use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::Path, path::PathBuf, time::Duration};
use utoipa::ToSchema;

use crate::error::{Error, Result};

/// Output file configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadConfig {
    /// Flat directory that receives every produced file (default: "./downloads")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
        }
    }
}

/// External tool configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolsConfig {
    /// Path to yt-dlp executable (auto-detected if None)
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Whether to search PATH for yt-dlp if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// User-Agent header the tool presents to the source site
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Hard limit for producing one file, in seconds (default: 300)
    #[serde(default = "default_fetch_timeout", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub fetch_timeout: Duration,

    /// Hard limit for a metadata lookup, in seconds (default: 30)
    #[serde(default = "default_lookup_timeout", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub lookup_timeout: Duration,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            search_path: true,
            user_agent: default_user_agent(),
            fetch_timeout: default_fetch_timeout(),
            lookup_timeout: default_lookup_timeout(),
        }
    }
}

/// Eviction of finished jobs and their files
///
/// Disabled by default: finished jobs and files are kept until the process
/// exits or something outside the server removes them.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RetentionConfig {
    /// Enable the periodic sweep (default: false)
    #[serde(default)]
    pub enabled: bool,

    /// Age after which a completed or failed job is evicted, in seconds (default: 24h)
    #[serde(default = "default_max_age", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub max_age: Duration,

    /// How often the sweep runs, in seconds (default: 10 minutes)
    #[serde(default = "default_sweep_interval", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub sweep_interval: Duration,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_age: default_max_age(),
            sweep_interval: default_sweep_interval(),
        }
    }
}

/// Main configuration
///
/// Fields are organized into logical sub-configs:
/// - [`download`](DownloadConfig): output directory
/// - [`tools`](ToolsConfig): external binary, user agent, timeouts
/// - [`retention`](RetentionConfig): optional eviction sweep
/// - [`server`](ServerIntegrationConfig): REST API
///
/// `download` and `tools` are flattened, so their keys sit at the top level
/// of a config file.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Output file settings
    #[serde(flatten)]
    pub download: DownloadConfig,

    /// External tool settings
    #[serde(flatten)]
    pub tools: ToolsConfig,

    /// Eviction of finished jobs
    #[serde(default)]
    pub retention: RetentionConfig,

    /// API server settings
    #[serde(flatten)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Download directory
    pub fn download_dir(&self) -> &PathBuf {
        &self.download.download_dir
    }

    /// Load a TOML config file
    ///
    /// Missing keys take their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("cannot read {}: {}", path.display(), e),
            key: None,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse TOML config text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|e| Error::Config {
            message: e.to_string(),
            key: None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.tools.fetch_timeout.is_zero() {
            return Err(Error::Config {
                message: "fetch_timeout must be greater than zero".into(),
                key: Some("fetch_timeout".into()),
            });
        }
        if self.tools.lookup_timeout.is_zero() {
            return Err(Error::Config {
                message: "lookup_timeout must be greater than zero".into(),
                key: Some("lookup_timeout".into()),
            });
        }
        if self.retention.enabled && self.retention.sweep_interval.is_zero() {
            return Err(Error::Config {
                message: "retention.sweep_interval must be greater than zero".into(),
                key: Some("retention.sweep_interval".into()),
            });
        }
        Ok(())
    }
}

/// API and external server integration configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:8000)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".into()
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(300) // 5 minutes
}

fn default_lookup_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_age() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

fn default_sweep_interval() -> Duration {
    Duration::from_secs(10 * 60)
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
