//! Credential resolution for login scenarios.
//!
//! A [`UserCategory`] describes a login precondition, not an identity. The
//! [`CredentialResolver`] turns it into concrete [`Credentials`] using a
//! [`CredentialConfig`] snapshot handed to it at construction. The resolver
//! never reads the process environment itself.

use crate::result::{SwagError, SwagResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Login precondition driving positive and negative scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserCategory {
    /// Standard account with the correct password
    Valid,
    /// Standard account with a wrong password
    Invalid,
    /// Both fields left blank
    Empty,
    /// Username left blank
    EmptyUsername,
    /// Password left blank
    EmptyPassword,
    /// Account that the storefront refuses
    LockedOut,
    /// Account rendering deliberately broken product images
    Problem,
    /// Account whose login is deliberately slow
    PerformanceGlitch,
}

impl UserCategory {
    /// All defined categories
    pub const ALL: [Self; 8] = [
        Self::Valid,
        Self::Invalid,
        Self::Empty,
        Self::EmptyUsername,
        Self::EmptyPassword,
        Self::LockedOut,
        Self::Problem,
        Self::PerformanceGlitch,
    ];

    /// Tag used in configuration and on the command line
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Empty => "empty",
            Self::EmptyUsername => "empty_username",
            Self::EmptyPassword => "empty_password",
            Self::LockedOut => "locked_out",
            Self::Problem => "problem",
            Self::PerformanceGlitch => "performance_glitch",
        }
    }

    /// Whether the category forces one or both fields to be blank
    #[must_use]
    pub const fn is_negative_input(self) -> bool {
        matches!(
            self,
            Self::Empty | Self::EmptyUsername | Self::EmptyPassword
        )
    }
}

impl fmt::Display for UserCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for UserCategory {
    type Err = SwagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.tag() == s)
            .ok_or_else(|| SwagError::UnsupportedCategory {
                category: s.to_string(),
            })
    }
}

/// A username/password pair, possibly blank
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username typed into the login form
    pub username: String,
    /// Password typed into the login form
    pub password: String,
}

impl Credentials {
    /// Create a credential pair
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Passwords stay out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .finish()
    }
}

/// Configuration keys the resolver may require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKey {
    /// `VALID_USER_USERNAME`
    ValidUsername,
    /// `VALID_USER_PASSWORD`
    ValidPassword,
    /// `INVALID_USER_PASSWORD`
    InvalidPassword,
    /// `LOCKED_OUT_USER_USERNAME`
    LockedOutUsername,
    /// `PROBLEM_USER_USERNAME`
    ProblemUsername,
    /// `PERFORMANCE_GLITCH_USER_USERNAME`
    PerformanceGlitchUsername,
}

impl CredentialKey {
    /// All keys
    pub const ALL: [Self; 6] = [
        Self::ValidUsername,
        Self::ValidPassword,
        Self::InvalidPassword,
        Self::LockedOutUsername,
        Self::ProblemUsername,
        Self::PerformanceGlitchUsername,
    ];

    /// Environment variable name
    #[must_use]
    pub const fn env_name(self) -> &'static str {
        match self {
            Self::ValidUsername => "VALID_USER_USERNAME",
            Self::ValidPassword => "VALID_USER_PASSWORD",
            Self::InvalidPassword => "INVALID_USER_PASSWORD",
            Self::LockedOutUsername => "LOCKED_OUT_USER_USERNAME",
            Self::ProblemUsername => "PROBLEM_USER_USERNAME",
            Self::PerformanceGlitchUsername => "PERFORMANCE_GLITCH_USER_USERNAME",
        }
    }
}

/// Snapshot of the credential configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// Username of the standard account
    pub valid_user_username: Option<String>,
    /// Password shared by every real account
    pub valid_user_password: Option<String>,
    /// Deliberately wrong password
    pub invalid_user_password: Option<String>,
    /// Username of the locked-out account
    pub locked_out_user_username: Option<String>,
    /// Username of the problem account
    pub problem_user_username: Option<String>,
    /// Username of the performance-glitch account
    pub performance_glitch_user_username: Option<String>,
}

impl CredentialConfig {
    /// Create an empty configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from any key/value source, keyed by environment variable name
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        for key in CredentialKey::ALL {
            if let Some(value) = lookup(key.env_name()) {
                config.set(key, value);
            }
        }
        config
    }

    /// Snapshot the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Set a value
    pub fn set(&mut self, key: CredentialKey, value: impl Into<String>) {
        *self.slot_mut(key) = Some(value.into());
    }

    /// Set a value (builder form)
    #[must_use]
    pub fn with(mut self, key: CredentialKey, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Get a value, treating blank strings as absent
    #[must_use]
    pub fn get(&self, key: CredentialKey) -> Option<&str> {
        let slot = match key {
            CredentialKey::ValidUsername => &self.valid_user_username,
            CredentialKey::ValidPassword => &self.valid_user_password,
            CredentialKey::InvalidPassword => &self.invalid_user_password,
            CredentialKey::LockedOutUsername => &self.locked_out_user_username,
            CredentialKey::ProblemUsername => &self.problem_user_username,
            CredentialKey::PerformanceGlitchUsername => &self.performance_glitch_user_username,
        };
        slot.as_deref().filter(|v| !v.is_empty())
    }

    /// Overlay every value present in `other`
    pub fn merge(&mut self, other: &Self) {
        for key in CredentialKey::ALL {
            if let Some(value) = other.get(key) {
                self.set(key, value);
            }
        }
    }

    /// Keys that are absent or blank
    #[must_use]
    pub fn missing_keys(&self) -> Vec<CredentialKey> {
        CredentialKey::ALL
            .into_iter()
            .filter(|k| self.get(*k).is_none())
            .collect()
    }

    fn slot_mut(&mut self, key: CredentialKey) -> &mut Option<String> {
        match key {
            CredentialKey::ValidUsername => &mut self.valid_user_username,
            CredentialKey::ValidPassword => &mut self.valid_user_password,
            CredentialKey::InvalidPassword => &mut self.invalid_user_password,
            CredentialKey::LockedOutUsername => &mut self.locked_out_user_username,
            CredentialKey::ProblemUsername => &mut self.problem_user_username,
            CredentialKey::PerformanceGlitchUsername => {
                &mut self.performance_glitch_user_username
            }
        }
    }
}

/// Resolves user categories against an injected configuration
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    config: CredentialConfig,
}

impl CredentialResolver {
    /// Create a resolver over a configuration snapshot
    #[must_use]
    pub const fn new(config: CredentialConfig) -> Self {
        Self { config }
    }

    /// The configuration snapshot in use
    #[must_use]
    pub const fn config(&self) -> &CredentialConfig {
        &self.config
    }

    /// Produce the credentials for a category.
    ///
    /// Fails with [`SwagError::MissingConfiguration`] if a key the category
    /// needs is absent or blank. Blank fields of negative-input categories
    /// are forced regardless of configuration.
    pub fn resolve(&self, category: UserCategory) -> SwagResult<Credentials> {
        use CredentialKey as K;

        let (user, pass) = match category {
            UserCategory::Valid => (Some(K::ValidUsername), Some(K::ValidPassword)),
            UserCategory::Invalid => (Some(K::ValidUsername), Some(K::InvalidPassword)),
            UserCategory::Empty => (None, None),
            UserCategory::EmptyUsername => (None, Some(K::ValidPassword)),
            UserCategory::EmptyPassword => (Some(K::ValidUsername), None),
            UserCategory::LockedOut => (Some(K::LockedOutUsername), Some(K::ValidPassword)),
            UserCategory::Problem => (Some(K::ProblemUsername), Some(K::ValidPassword)),
            UserCategory::PerformanceGlitch => {
                (Some(K::PerformanceGlitchUsername), Some(K::ValidPassword))
            }
        };

        let username = user.map(|k| self.require(k)).transpose()?.unwrap_or_default();
        let password = pass.map(|k| self.require(k)).transpose()?.unwrap_or_default();

        tracing::debug!(%category, username = %username, "resolved credentials");
        Ok(Credentials { username, password })
    }

    /// Resolve a category given by tag
    pub fn resolve_tag(&self, tag: &str) -> SwagResult<Credentials> {
        self.resolve(tag.parse()?)
    }

    fn require(&self, key: CredentialKey) -> SwagResult<String> {
        self.config
            .get(key)
            .map(str::to_string)
            .ok_or_else(|| SwagError::MissingConfiguration {
                key: key.env_name().to_string(),
            })
    }
}
