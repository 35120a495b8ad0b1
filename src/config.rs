use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration.
///
/// Built either from the environment (`from_env`) or programmatically with
/// the `with_*` builders. All fields have working defaults except the data
/// directory, which defaults to `.food-delivery` in the current directory.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend base URL, e.g. "http://127.0.0.1:8000/api".
    pub base_url: String,
    /// Request timeout for a single HTTP call.
    pub timeout: Duration,
    /// Directory the local store writes its files into.
    pub data_dir: PathBuf,
    /// Interval between order tracking polls.
    pub poll_interval: Duration,
}

impl AppConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            data_dir: PathBuf::from(".food-delivery"),
            poll_interval: Duration::from_secs(4),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000/api".to_string());
        let timeout = env::var("API_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse::<u64>().ok())
            .unwrap_or(30);
        let data_dir = env::var("APP_DATA_DIR").unwrap_or_else(|_| ".food-delivery".to_string());
        let poll_interval = env::var("ORDER_POLL_SECS")
            .ok()
            .and_then(|t| t.parse::<u64>().ok())
            .unwrap_or(4);
        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout),
            data_dir: PathBuf::from(data_dir),
            poll_interval: Duration::from_secs(poll_interval),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new("http://127.0.0.1:8000/api")
    }
}
