//! Configuration management for promptgate services

use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::ffi::OsString;
use std::path::Path;

/// FTP repository configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FtpConfig {
    pub host: String,
    #[serde(default = "default_ftp_port")]
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    /// Directory on the FTP server that is served as the web document root
    #[serde(default = "default_root_dir")]
    pub root_dir: String,
    /// Public base URL the FTP root is reachable under
    pub base_domain: String,
}

impl FtpConfig {
    /// `host:port` address for the control connection
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Outbound HTTP configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Defaults for long-running job polling
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_poll_max_attempts")]
    pub max_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval_secs(),
            max_attempts: default_poll_max_attempts(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub ftp: FtpConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    /// Per-service API keys, keyed by service name (e.g. `elevenlabs`)
    #[serde(default)]
    pub api_keys: HashMap<String, String>,
    /// Per-service base URL overrides, keyed by service name
    #[serde(default)]
    pub endpoints: HashMap<String, String>,
    pub log_level: Option<String>,
}

fn default_ftp_port() -> u16 {
    21
}

fn default_root_dir() -> String {
    "/".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_poll_max_attempts() -> u32 {
    30
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let host = env::var("FTP_HOST")
            .map_err(|_| config::ConfigError::NotFound("FTP_HOST".to_string()))?;
        let base_domain = env::var("FTP_BASE_DOMAIN")
            .map_err(|_| config::ConfigError::NotFound("FTP_BASE_DOMAIN".to_string()))?;

        let port = parse_var("FTP_PORT")?.unwrap_or_else(default_ftp_port);

        let ftp = FtpConfig {
            host,
            port,
            user: env::var("FTP_USER").unwrap_or_default(),
            password: env::var("FTP_PASSWORD").unwrap_or_default(),
            root_dir: env::var("FTP_ROOT_DIR").unwrap_or_else(|_| default_root_dir()),
            base_domain,
        };

        let http = HttpConfig {
            timeout_secs: parse_var("HTTP_TIMEOUT_SECS")?.unwrap_or_else(default_timeout_secs),
        };

        let polling = PollingConfig {
            interval_secs: parse_var("POLL_INTERVAL_SECS")?
                .unwrap_or_else(default_poll_interval_secs),
            max_attempts: parse_var("POLL_MAX_ATTEMPTS")?
                .unwrap_or_else(default_poll_max_attempts),
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            ftp,
            http,
            polling,
            api_keys: collect_service_vars(utf8_vars(env::vars_os()), "_API_KEY"),
            endpoints: collect_service_vars(utf8_vars(env::vars_os()), "_BASE_URL"),
            log_level: Some(log_level),
        })
    }

    /// Load configuration from a file, with `PROMPTGATE__*` environment overrides
    ///
    /// Nested keys use a double underscore, e.g. `PROMPTGATE__FTP__HOST`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let _ = dotenvy::dotenv();

        config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix("PROMPTGATE").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// API key configured for a service, if any
    pub fn api_key(&self, service: &str) -> Option<&str> {
        self.api_keys.get(service).map(String::as_str)
    }

    /// Base URL override configured for a service, if any
    pub fn endpoint(&self, service: &str) -> Option<&str> {
        self.endpoints.get(service).map(String::as_str)
    }

    /// Get log level, defaulting to "info"
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, config::ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| config::ConfigError::Message(format!("{} has an invalid value: {}", name, raw))),
        Err(_) => Ok(None),
    }
}

/// Environment entries whose name and value are valid UTF-8; the rest are skipped
fn utf8_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

/// Collect `<SERVICE><suffix>` variables into a map keyed by service name.
///
/// `ELEVENLABS_API_KEY` becomes `elevenlabs`, `FACE_SWAP_API_KEY` becomes `face-swap`.
pub fn collect_service_vars<I>(vars: I, suffix: &str) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| {
            let service = key.strip_suffix(suffix)?;
            if service.is_empty() || value.is_empty() {
                return None;
            }
            Some((service.to_lowercase().replace('_', "-"), value))
        })
        .collect()
}
