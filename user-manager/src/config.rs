use crate::r#static::{
    CREATE_DELAY_MS, DEFAULT_BASE_URL, DEFAULT_CACHE_CAPACITY, LIST_LIMIT, MAX_BULK_CREATE,
    MAX_CONCURRENT_REQUESTS, REQUEST_TIMEOUT_MS,
};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};
use serde_inline_default::serde_inline_default;
use std::path::Path;
use std::time::Duration;

/// Prefix of environment variables overriding file settings, e.g. `USER_MANAGER_CACHE_CAPACITY`.
pub const ENV_PREFIX: &str = "USER_MANAGER_";

/// Tunables of the user manager and its HTTP client.
#[serde_inline_default]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, CopyGetters)]
pub struct ManagerConfig {
    /// Base url template; `{app_id}` is replaced by the application id
    #[serde_inline_default(DEFAULT_BASE_URL.to_string())]
    #[getset(get = "pub")]
    base_url: String,
    /// Maximum number of cached users
    #[serde_inline_default(DEFAULT_CACHE_CAPACITY)]
    #[getset(get_copy = "pub")]
    cache_capacity: usize,
    /// Maximum number of remote calls in flight at once
    #[serde_inline_default(MAX_CONCURRENT_REQUESTS)]
    #[getset(get_copy = "pub")]
    max_concurrent_requests: usize,
    /// Bulk creations of this many users or more are rejected
    #[serde_inline_default(MAX_BULK_CREATE)]
    #[getset(get_copy = "pub")]
    max_bulk_create: usize,
    /// Page size of nickname searches
    #[serde_inline_default(LIST_LIMIT)]
    #[getset(get_copy = "pub")]
    list_limit: usize,
    #[serde_inline_default(CREATE_DELAY_MS)]
    create_delay_ms: u64,
    #[serde_inline_default(REQUEST_TIMEOUT_MS)]
    request_timeout_ms: u64,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_concurrent_requests: MAX_CONCURRENT_REQUESTS,
            max_bulk_create: MAX_BULK_CREATE,
            list_limit: LIST_LIMIT,
            create_delay_ms: CREATE_DELAY_MS,
            request_timeout_ms: REQUEST_TIMEOUT_MS,
        }
    }
}

impl ManagerConfig {
    /// Loads defaults, then the YAML file at `path` (if it exists), then environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Figment::from(Serialized::defaults(Self::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract::<Self>()?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Rejects settings the cache and the request limiter cannot be built with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("cache_capacity", self.cache_capacity),
            ("max_concurrent_requests", self.max_concurrent_requests),
            ("max_bulk_create", self.max_bulk_create),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be at least 1", name)));
            }
        }
        Ok(())
    }

    /// Delay applied before every create call.
    pub fn create_delay(&self) -> Duration {
        Duration::from_millis(self.create_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_max_concurrent_requests(mut self, max: usize) -> Self {
        self.max_concurrent_requests = max;
        self
    }

    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = timeout.as_millis() as u64;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Figment(#[from] Box<figment::Error>),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::Figment(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempdir::TempDir;

    #[test]
    fn test_defaults() {
        let config = ManagerConfig::default();
        assert_eq!(config.cache_capacity(), 10);
        assert_eq!(config.max_concurrent_requests(), 10);
        assert_eq!(config.max_bulk_create(), 10);
        assert_eq!(config.list_limit(), 100);
        assert_eq!(config.create_delay(), Duration::from_secs(1));
        assert_eq!(config.base_url(), "https://api-{app_id}.sendbird.com");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let dir = TempDir::new("user-manager").unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "cache_capacity: 50\ncreate_delay_ms: 250\n").unwrap();

        let config = ManagerConfig::load(&path).unwrap();
        assert_eq!(config.cache_capacity(), 50);
        assert_eq!(config.create_delay(), Duration::from_millis(250));
        assert_eq!(config.max_concurrent_requests(), 10);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = TempDir::new("user-manager").unwrap();
        let config = ManagerConfig::load(dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, ManagerConfig::default());
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let dir = TempDir::new("user-manager").unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "cache_capacity: lots\n").unwrap();

        assert!(ManagerConfig::load(&path).is_err());
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        let dir = TempDir::new("user-manager").unwrap();
        let path = dir.path().join("config.yaml");

        for (setting, field) in [
            ("cache_capacity: 0\n", "cache_capacity"),
            ("max_concurrent_requests: 0\n", "max_concurrent_requests"),
            ("max_bulk_create: 0\n", "max_bulk_create"),
        ] {
            fs::write(&path, setting).unwrap();
            match ManagerConfig::load(&path) {
                Err(ConfigError::Invalid(message)) => assert!(message.contains(field)),
                other => panic!("unexpected result for {}: {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(ManagerConfig::default().validate().is_ok());
        assert!(ManagerConfig::default().with_cache_capacity(0).validate().is_err());
    }

    #[test]
    fn test_serde_defaults_for_bare_document() {
        let config: ManagerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ManagerConfig::default());
    }
}
