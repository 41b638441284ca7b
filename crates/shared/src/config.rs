//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Image storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Domain settings.
    #[serde(default)]
    pub app: AppSettings,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Image storage settings.
///
/// `provider` selects the backend: `fs` uses `root`, `s3` uses the
/// endpoint/bucket/credential fields.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Storage provider name (`fs` or `s3`).
    #[serde(default = "default_storage_provider")]
    pub provider: String,
    /// Root directory for the `fs` provider.
    #[serde(default = "default_storage_root")]
    pub root: String,
    /// S3 endpoint URL.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// S3 bucket name.
    #[serde(default)]
    pub bucket: Option<String>,
    /// S3 access key ID.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// S3 secret access key.
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// S3 region.
    #[serde(default)]
    pub region: Option<String>,
    /// Largest accepted image in bytes.
    #[serde(default = "default_max_image_size")]
    pub max_image_size: u64,
}

fn default_storage_provider() -> String {
    "fs".to_string()
}

fn default_storage_root() -> String {
    "uploads".to_string()
}

fn default_max_image_size() -> u64 {
    5 * 1024 * 1024
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: default_storage_provider(),
            root: default_storage_root(),
            endpoint: None,
            bucket: None,
            access_key_id: None,
            secret_access_key: None,
            region: None,
            max_image_size: default_max_image_size(),
        }
    }
}

/// Domain-level settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    /// IANA time zone used for `updated_at` stamps.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

fn default_time_zone() -> String {
    "Asia/Kolkata".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
        }
    }
}

impl AppSettings {
    /// Parses the configured time zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known IANA zone.
    pub fn tz(&self) -> Result<chrono_tz::Tz, config::ConfigError> {
        self.time_zone.parse::<chrono_tz::Tz>().map_err(|_| {
            config::ConfigError::Message(format!("unknown time zone '{}'", self.time_zone))
        })
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of the human-readable format.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "entryflow=debug,sea_orm=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("ENTRYFLOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
