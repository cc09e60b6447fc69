use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

pub const DEFAULT_API_URL: &str = "https://api.huobi.pro";
pub const DEFAULT_WS_MARKET_URL: &str = "wss://api.huobi.pro/ws";
pub const DEFAULT_WS_MARKET_FEED_URL: &str = "wss://api.huobi.pro/feed";
pub const DEFAULT_WS_ACCOUNT_URL: &str = "wss://api.huobi.pro/ws/v2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub access_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub api_url: Option<String>,
    pub ws_market_url: Option<String>,
    pub ws_market_feed_url: Option<String>,
    pub ws_account_url: Option<String>,
    pub timeout_seconds: u64,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ExchangeConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ExchangeConfig", 7)?;
        state.serialize_field("access_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field("api_url", &self.api_url)?;
        state.serialize_field("ws_market_url", &self.ws_market_url)?;
        state.serialize_field("ws_market_feed_url", &self.ws_market_feed_url)?;
        state.serialize_field("ws_account_url", &self.ws_account_url)?;
        state.serialize_field("timeout_seconds", &self.timeout_seconds)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ExchangeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ExchangeConfigHelper {
            #[serde(default)]
            access_key: String,
            #[serde(default)]
            secret_key: String,
            api_url: Option<String>,
            ws_market_url: Option<String>,
            ws_market_feed_url: Option<String>,
            ws_account_url: Option<String>,
            timeout_seconds: Option<u64>,
        }

        let helper = ExchangeConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            access_key: Secret::new(helper.access_key),
            secret_key: Secret::new(helper.secret_key),
            api_url: helper.api_url,
            ws_market_url: helper.ws_market_url,
            ws_market_feed_url: helper.ws_market_feed_url,
            ws_account_url: helper.ws_account_url,
            timeout_seconds: helper.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self::read_only()
    }
}

impl ExchangeConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(access_key: String, secret_key: String) -> Self {
        Self {
            access_key: Secret::new(access_key),
            secret_key: Secret::new(secret_key),
            api_url: None,
            ws_market_url: None,
            ws_market_feed_url: None,
            ws_account_url: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Configuration for public endpoints only (market data, reference data).
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(String::new(), String::new())
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables (prefix `HUOBI` shown):
    /// - `HUOBI_ACCESS_KEY`, `HUOBI_SECRET_KEY` (optional, both or neither)
    /// - `HUOBI_API_URL`, `HUOBI_WS_MARKET_URL`, `HUOBI_WS_MARKET_FEED_URL`,
    ///   `HUOBI_WS_ACCOUNT_URL` (optional endpoint overrides)
    /// - `HUOBI_TIMEOUT_SECS` (optional, defaults to 30)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let var = |name: &str| env::var(format!("{}_{}", prefix, name)).ok();

        let access_key = var("ACCESS_KEY");
        let secret_key = var("SECRET_KEY");
        let (access_key, secret_key) = match (access_key, secret_key) {
            (Some(access), Some(secret)) => (access, secret),
            (None, None) => (String::new(), String::new()),
            (Some(_), None) => {
                return Err(ConfigError::MissingEnvironmentVariable(format!(
                    "{}_SECRET_KEY",
                    prefix
                )))
            }
            (None, Some(_)) => {
                return Err(ConfigError::MissingEnvironmentVariable(format!(
                    "{}_ACCESS_KEY",
                    prefix
                )))
            }
        };

        let timeout_seconds = match var("TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                Ok(_) => {
                    return Err(ConfigError::InvalidConfiguration(format!(
                        "{}_TIMEOUT_SECS must be a positive integer: got 0",
                        prefix
                    )))
                }
                Err(e) => {
                    return Err(ConfigError::InvalidConfiguration(format!(
                        "{}_TIMEOUT_SECS must be a positive integer: {}",
                        prefix, e
                    )))
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            access_key: Secret::new(access_key),
            secret_key: Secret::new(secret_key),
            api_url: var("API_URL"),
            ws_market_url: var("WS_MARKET_URL"),
            ws_market_feed_url: var("WS_MARKET_FEED_URL"),
            ws_account_url: var("WS_ACCOUNT_URL"),
            timeout_seconds,
        })
    }

    /// Create configuration from .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(_) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // no file, fall back to the process environment
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    /// Check if this configuration has valid credentials for authenticated operations
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.access_key.expose_secret().is_empty() && !self.secret_key.expose_secret().is_empty()
    }

    #[must_use]
    pub fn api_url(mut self, api_url: String) -> Self {
        self.api_url = Some(api_url);
        self
    }

    #[must_use]
    pub fn ws_market_url(mut self, url: String) -> Self {
        self.ws_market_url = Some(url);
        self
    }

    #[must_use]
    pub fn ws_account_url(mut self, url: String) -> Self {
        self.ws_account_url = Some(url);
        self
    }

    #[must_use]
    pub const fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn resolved_api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn resolved_ws_market_url(&self) -> &str {
        self.ws_market_url.as_deref().unwrap_or(DEFAULT_WS_MARKET_URL)
    }

    pub fn resolved_ws_market_feed_url(&self) -> &str {
        self.ws_market_feed_url
            .as_deref()
            .unwrap_or(DEFAULT_WS_MARKET_FEED_URL)
    }

    pub fn resolved_ws_account_url(&self) -> &str {
        self.ws_account_url
            .as_deref()
            .unwrap_or(DEFAULT_WS_ACCOUNT_URL)
    }

    /// Get access key (use carefully - exposes secret)
    pub fn access_key(&self) -> &str {
        self.access_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_redacts_secrets() {
        let config = ExchangeConfig::new("my-access".to_string(), "my-secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("my-access"));
        assert!(!json.contains("my-secret"));
        assert!(json.contains("[REDACTED]"));
    }

    #[test]
    fn test_defaults_resolve_to_public_endpoints() {
        let config = ExchangeConfig::read_only();
        assert!(!config.has_credentials());
        assert_eq!(config.resolved_api_url(), "https://api.huobi.pro");
        assert_eq!(config.resolved_ws_market_url(), "wss://api.huobi.pro/ws");
        assert_eq!(config.resolved_ws_account_url(), "wss://api.huobi.pro/ws/v2");
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_overrides() {
        let config = ExchangeConfig::new("a".into(), "b".into())
            .api_url("http://127.0.0.1:9000".into())
            .timeout_seconds(5);
        assert!(config.has_credentials());
        assert_eq!(config.resolved_api_url(), "http://127.0.0.1:9000");
        assert_eq!(config.timeout_seconds, 5);
    }

    #[test]
    fn test_from_env_reads_prefixed_variables() {
        env::set_var("HBXTEST_ACCESS_KEY", "env-access");
        env::set_var("HBXTEST_SECRET_KEY", "env-secret");
        env::set_var("HBXTEST_API_URL", "https://api-aws.huobi.pro");
        env::set_var("HBXTEST_TIMEOUT_SECS", "12");

        let config = ExchangeConfig::from_env("hbxtest").unwrap();
        assert_eq!(config.access_key(), "env-access");
        assert_eq!(config.secret_key(), "env-secret");
        assert_eq!(config.resolved_api_url(), "https://api-aws.huobi.pro");
        assert_eq!(config.timeout_seconds, 12);
    }

    #[test]
    fn test_from_env_rejects_half_credentials() {
        env::set_var("HBXHALF_ACCESS_KEY", "only-access");
        env::remove_var("HBXHALF_SECRET_KEY");

        let err = ExchangeConfig::from_env("hbxhalf").unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvironmentVariable(ref v) if v == "HBXHALF_SECRET_KEY"));
    }

    #[test]
    fn test_from_env_rejects_zero_timeout() {
        env::remove_var("HBXZERO_ACCESS_KEY");
        env::remove_var("HBXZERO_SECRET_KEY");
        env::set_var("HBXZERO_TIMEOUT_SECS", "0");

        let err = ExchangeConfig::from_env("hbxzero").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration(ref m) if m.contains("HBXZERO_TIMEOUT_SECS")));

        env::set_var("HBXZERO_TIMEOUT_SECS", "soon");
        assert!(ExchangeConfig::from_env("hbxzero").is_err());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: ExchangeConfig =
            serde_json::from_str(r#"{"access_key":"k","secret_key":"s","api_url":null,"ws_market_url":null,"ws_market_feed_url":null,"ws_account_url":null}"#)
                .unwrap();
        assert!(config.has_credentials());
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECS);
    }
}
