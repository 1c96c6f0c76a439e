use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Create the HTTP client used for back-office API requests.
///
/// The cookie store is enabled because the refresh credential travels as an
/// HTTP-only cookie set by the auth endpoints.
pub fn create_http_client(timeout: Duration) -> Client {
    ClientBuilder::new()
        .cookie_store(true)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to create HTTP client")
}

/// Configuration for the back-office API client
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend, without a trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: "http://localhost:8080".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Create a new configuration for the given backend base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Config {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read configuration from the process environment.
    ///
    /// `FLIGHTDESK_API_URL` sets the backend base URL and
    /// `FLIGHTDESK_TIMEOUT_SECS` the request timeout in seconds; unset or
    /// unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(url) = std::env::var("FLIGHTDESK_API_URL") {
            if !url.is_empty() {
                config.base_url = url;
            }
        }

        if let Some(secs) = std::env::var("FLIGHTDESK_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }

        config
    }
}

/// Sink for the forced navigation performed when the session is terminated.
///
/// The web console replaces the window location with the landing page; host
/// applications provide their own equivalent here.
pub trait Navigator: Send + Sync {
    /// Replace the current location with `path`
    fn replace(&self, path: &str);
}

/// Navigator that ignores navigation requests, for headless callers
#[derive(Debug, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn replace(&self, path: &str) {
        tracing::debug!(path, "navigation request ignored");
    }
}
