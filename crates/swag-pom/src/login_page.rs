//! Login screen page object.

use crate::credentials::{CredentialResolver, UserCategory};
use crate::driver::BrowserDriver;
use crate::page_object::{Page, PageObject, Screen, Step};
use crate::result::SwagResult;
use crate::selector::{ElementName, Selector, SelectorRegistry};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Elements of the login screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginElement {
    /// Username input
    UsernameInput,
    /// Password input
    PasswordInput,
    /// Submit button
    LoginButton,
    /// Error banner shown after a rejected login
    ErrorMessage,
    /// Swag Labs logo above the form
    LoginLogo,
}

impl ElementName for LoginElement {
    const SCREEN: &'static str = "login";
    const ALL: &'static [Self] = &[
        Self::UsernameInput,
        Self::PasswordInput,
        Self::LoginButton,
        Self::ErrorMessage,
        Self::LoginLogo,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::UsernameInput => "username_input",
            Self::PasswordInput => "password_input",
            Self::LoginButton => "login_button",
            Self::ErrorMessage => "error_message",
            Self::LoginLogo => "login_logo",
        }
    }
}

/// Build the login screen registry
pub fn build_login_selectors() -> SwagResult<SelectorRegistry<LoginElement>> {
    SelectorRegistry::builder()
        .with(LoginElement::UsernameInput, Selector::data_test("username"))
        .with(LoginElement::PasswordInput, Selector::data_test("password"))
        .with(LoginElement::LoginButton, Selector::data_test("login-button"))
        .with(LoginElement::ErrorMessage, Selector::css(".error-message-container"))
        .with(LoginElement::LoginLogo, Selector::css(".login_logo"))
        .build()
}

/// Process-wide login registry, built on first use
pub fn login_selectors() -> SwagResult<&'static SelectorRegistry<LoginElement>> {
    static REGISTRY: OnceLock<SelectorRegistry<LoginElement>> = OnceLock::new();
    if let Some(registry) = REGISTRY.get() {
        return Ok(registry);
    }
    let built = build_login_selectors()?;
    Ok(REGISTRY.get_or_init(|| built))
}

/// Rejected-login cases and the storefront's exact messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginErrorKind {
    /// Wrong username/password combination
    InvalidCredentials,
    /// Both fields blank
    EmptyCredentials,
    /// Username blank
    EmptyUsername,
    /// Password blank
    EmptyPassword,
    /// Account is locked out
    LockedOut,
}

impl LoginErrorKind {
    /// All cases
    pub const ALL: [Self; 5] = [
        Self::InvalidCredentials,
        Self::EmptyCredentials,
        Self::EmptyUsername,
        Self::EmptyPassword,
        Self::LockedOut,
    ];

    /// Message rendered by the storefront, byte-for-byte
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidCredentials => {
                "Epic sadface: Username and password do not match any user in this service"
            }
            Self::EmptyCredentials | Self::EmptyUsername => "Epic sadface: Username is required",
            Self::EmptyPassword => "Epic sadface: Password is required",
            Self::LockedOut => "Epic sadface: Sorry, this user has been locked out.",
        }
    }
}

impl fmt::Display for LoginErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// What the login screen currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    /// The empty form
    LoginForm,
    /// The session left the login screen
    Authenticated,
    /// The form with an error banner
    Error(String),
}

/// Page object for the login screen
#[derive(Debug)]
pub struct LoginPage<'a, D: BrowserDriver> {
    page: Page<'a, LoginElement, D>,
    credentials: &'a CredentialResolver,
    base_url: String,
}

impl<'a, D: BrowserDriver> LoginPage<'a, D> {
    /// Create the page object for one session
    pub fn new(
        driver: &'a D,
        credentials: &'a CredentialResolver,
        base_url: impl Into<String>,
    ) -> SwagResult<Self> {
        Ok(Self {
            page: Page::new(driver, login_selectors()?),
            credentials,
            base_url: base_url.into(),
        })
    }

    // --- ACTIONS ---

    /// Open the login form
    pub async fn navigate(&self) -> SwagResult<()> {
        tracing::debug!(base_url = %self.base_url, "open login form");
        self.page
            .perform(&[Step::Navigate(format!(
                "{}/",
                self.base_url.trim_end_matches('/')
            ))])
            .await
    }

    /// Fill the form and press the login button
    pub async fn submit(&self, username: &str, password: &str) -> SwagResult<()> {
        tracing::debug!(username, "submit login form");
        self.page
            .perform(&[
                Step::Fill(LoginElement::UsernameInput, username.to_string()),
                Step::Fill(LoginElement::PasswordInput, password.to_string()),
                Step::Click(LoginElement::LoginButton),
            ])
            .await
    }

    /// Resolve the category's credentials, then submit them
    pub async fn login_as(&self, category: UserCategory) -> SwagResult<()> {
        let credentials = self.credentials.resolve(category)?;
        tracing::info!(%category, "login");
        self.submit(&credentials.username, &credentials.password)
            .await
    }

    /// Observe the screen without changing it
    pub async fn state(&self) -> SwagResult<LoginState> {
        if self.page.is_visible(LoginElement::ErrorMessage).await? {
            let message = self.page.text(LoginElement::ErrorMessage).await?;
            return Ok(LoginState::Error(message));
        }
        if self.page.is_visible(LoginElement::LoginButton).await? {
            return Ok(LoginState::LoginForm);
        }
        Ok(LoginState::Authenticated)
    }

    // --- ASSERTIONS ---

    /// The login form is displayed
    pub async fn assert_on_login_form(&self) -> SwagResult<()> {
        self.page.expect_visible(LoginElement::LoginLogo).await
    }

    /// The error banner shows exactly the message for `kind`
    pub async fn assert_error(&self, kind: LoginErrorKind) -> SwagResult<()> {
        self.page.expect_visible(LoginElement::ErrorMessage).await?;
        self.page
            .expect_text(LoginElement::ErrorMessage, kind.message())
            .await
    }

    /// Wrong password was rejected
    pub async fn verify_invalid_user(&self) -> SwagResult<()> {
        self.assert_error(LoginErrorKind::InvalidCredentials).await
    }

    /// Blank form was rejected
    pub async fn verify_empty_credentials(&self) -> SwagResult<()> {
        self.assert_error(LoginErrorKind::EmptyCredentials).await
    }

    /// Blank username was rejected
    pub async fn verify_empty_username(&self) -> SwagResult<()> {
        self.assert_error(LoginErrorKind::EmptyUsername).await
    }

    /// Blank password was rejected
    pub async fn verify_empty_password(&self) -> SwagResult<()> {
        self.assert_error(LoginErrorKind::EmptyPassword).await
    }

    /// Locked-out account was rejected
    pub async fn verify_locked_out_user(&self) -> SwagResult<()> {
        self.assert_error(LoginErrorKind::LockedOut).await
    }
}

#[async_trait]
impl<'a, D: BrowserDriver> PageObject for LoginPage<'a, D> {
    fn screen(&self) -> Screen {
        Screen::Login
    }

    async fn verify_loaded(&self) -> SwagResult<()> {
        self.assert_on_login_form().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_complete() {
        let registry = login_selectors().unwrap();
        assert_eq!(registry.len(), LoginElement::ALL.len());
        assert_eq!(
            registry.lookup(LoginElement::LoginButton).unwrap().to_css(),
            "[data-test=\"login-button\"]"
        );
    }

    #[test]
    fn test_registry_built_once() {
        let a = login_selectors().unwrap();
        let b = login_selectors().unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LoginErrorKind::LockedOut.message(),
            "Epic sadface: Sorry, this user has been locked out."
        );
        assert_eq!(
            LoginErrorKind::EmptyUsername.message(),
            LoginErrorKind::EmptyCredentials.message()
        );
        assert_eq!(
            LoginErrorKind::EmptyPassword.message(),
            "Epic sadface: Password is required"
        );
        assert_eq!(
            LoginErrorKind::InvalidCredentials.message(),
            "Epic sadface: Username and password do not match any user in this service"
        );
    }

    #[test]
    fn test_four_distinct_messages() {
        let mut messages: Vec<_> = LoginErrorKind::ALL.iter().map(|k| k.message()).collect();
        messages.sort_unstable();
        messages.dedup();
        assert_eq!(messages.len(), 4);
    }
}
