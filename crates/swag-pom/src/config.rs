//! Suite configuration.
//!
//! Sources, lowest precedence first: built-in defaults, a YAML file, then the
//! environment. Callers layer command-line overrides on top with the `with_*`
//! builders. The credential part is handed to
//! [`CredentialResolver`](crate::CredentialResolver) as-is.

use crate::credentials::CredentialConfig;
use crate::result::{SwagError, SwagResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Public Swag Labs deployment
pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com";

/// Default element wait (10 seconds)
pub const DEFAULT_ELEMENT_TIMEOUT_MS: u64 = 10_000;

/// Default navigation timeout (30 seconds)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval for auto-waiting (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Environment variable overriding the storefront URL
pub const BASE_URL_ENV: &str = "BASE_URL";

/// Environment variable overriding the element wait
pub const ELEMENT_TIMEOUT_ENV: &str = "ELEMENT_TIMEOUT_MS";

/// Configuration for one suite run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Storefront root URL
    pub base_url: String,
    /// Run the browser headless
    pub headless: bool,
    /// How long the driver waits for an element
    pub element_timeout_ms: u64,
    /// How long the driver waits for a navigation
    pub navigation_timeout_ms: u64,
    /// Polling interval while waiting
    pub poll_interval_ms: u64,
    /// Run chromium with its sandbox (disable inside containers)
    pub sandbox: bool,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Login accounts
    pub credentials: CredentialConfig,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headless: true,
            element_timeout_ms: DEFAULT_ELEMENT_TIMEOUT_MS,
            navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            sandbox: true,
            chromium_path: None,
            credentials: CredentialConfig::default(),
        }
    }
}

impl SuiteConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document; missing fields keep their defaults
    pub fn from_yaml_str(yaml: &str) -> SwagResult<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| SwagError::Config {
            message: e.to_string(),
        })
    }

    /// Read a YAML file
    pub fn from_file(path: &Path) -> SwagResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text).map_err(|e| SwagError::Config {
            message: format!("{}: {e}", path.display()),
        })
    }

    /// Overlay values from a key/value source keyed by environment names
    pub fn apply_lookup<F>(&mut self, lookup: F) -> SwagResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.is_empty()) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(ELEMENT_TIMEOUT_ENV).filter(|v| !v.is_empty()) {
            self.element_timeout_ms = raw.parse().map_err(|_| SwagError::Config {
                message: format!("{ELEMENT_TIMEOUT_ENV} must be a number of milliseconds, got '{raw}'"),
            })?;
        }
        self.credentials
            .merge(&CredentialConfig::from_lookup(&lookup));
        Ok(())
    }

    /// Defaults, then `path` if given, then the process environment
    pub fn load(path: Option<&Path>) -> SwagResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_lookup(|name| std::env::var(name).ok())?;
        tracing::debug!(
            base_url = %config.base_url,
            headless = config.headless,
            "loaded suite config"
        );
        Ok(config)
    }

    /// Set the storefront URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the element wait
    #[must_use]
    pub const fn with_element_timeout(mut self, timeout_ms: u64) -> Self {
        self.element_timeout_ms = timeout_ms;
        self
    }

    /// Enable or disable the chromium sandbox
    #[must_use]
    pub const fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Set the chromium binary
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Replace the credential configuration
    #[must_use]
    pub fn with_credentials(mut self, credentials: CredentialConfig) -> Self {
        self.credentials = credentials;
        self
    }

    /// Element wait as Duration
    #[must_use]
    pub const fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    /// Navigation timeout as Duration
    #[must_use]
    pub const fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// Poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Absolute URL for a path on the storefront
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
