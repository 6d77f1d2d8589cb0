use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub inference: InferenceSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub region: String,
    pub bucket: String,
    /// Override the S3 endpoint (S3-compatible stores, local test servers)
    pub endpoint: Option<String>,
    #[serde(default = "default_signed_url_expiry")]
    pub signed_url_expiry_secs: u64,
    /// Delete uploaded objects once the inference call has finished
    #[serde(default = "default_cleanup")]
    pub cleanup_after_scoring: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferenceSettings {
    pub api_key: String,
    #[serde(default = "default_inference_base_url")]
    pub base_url: String,
    #[serde(default = "default_inference_model")]
    pub model: String,
    #[serde(default = "default_inference_timeout")]
    pub timeout_secs: u64,
}

fn default_signed_url_expiry() -> u64 { 3600 }
fn default_cleanup() -> bool { true }
fn default_inference_base_url() -> String { "https://api.openai.com/v1".to_string() }
fn default_inference_model() -> String { "gpt-4o-mini".to_string() }
fn default_inference_timeout() -> u64 { 60 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with LUME_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with LUME_)
            // e.g., LUME_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("LUME")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Pick up conventional AWS/OpenAI variables when set
        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("LUME")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Substitute conventional environment variables into config values
///
/// `AWS_REGION`, `AWS_BUCKET_NAME` and `OPENAI_API_KEY` take precedence over
/// the file-based settings, so deployments can keep credentials out of the
/// config files entirely.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let region = env::var("AWS_REGION")
        .or_else(|_| env::var("LUME_STORAGE__REGION"))
        .ok();
    let bucket = env::var("AWS_BUCKET_NAME")
        .or_else(|_| env::var("LUME_STORAGE__BUCKET"))
        .ok();
    let api_key = env::var("OPENAI_API_KEY")
        .or_else(|_| env::var("LUME_INFERENCE__API_KEY"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(region) = region {
        builder = builder.set_override("storage.region", region)?;
    }
    if let Some(bucket) = bucket {
        builder = builder.set_override("storage.bucket", bucket)?;
    }
    if let Some(api_key) = api_key {
        builder = builder.set_override("inference.api_key", api_key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_inference_defaults() {
        assert_eq!(default_inference_base_url(), "https://api.openai.com/v1");
        assert_eq!(default_inference_model(), "gpt-4o-mini");
        assert_eq!(default_signed_url_expiry(), 3600);
        assert!(default_cleanup());
    }
}
