//! Page Object plumbing shared by every screen.
//!
//! A page object exposes named actions and named assertions; it never hands
//! raw selectors to callers. [`Page`] is the building block: it binds one
//! screen's [`SelectorRegistry`] to a session's [`BrowserDriver`] and offers
//! the element-level verbs the concrete page objects compose.
//!
//! Composite actions are written as an ordered list of [`Step`]s and run one
//! step at a time through [`Page::perform`], so the sequencing is data
//! rather than hidden control flow.

use crate::driver::{BrowserDriver, ElementState};
use crate::result::{SwagError, SwagResult};
use crate::selector::{ElementName, Selector, SelectorRegistry};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// External page the About link leads to
pub const ABOUT_URL: &str = "https://saucelabs.com/";

/// Logical screens of the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Login form at the storefront root
    Login,
    /// Product listing
    Inventory,
    /// Shopping cart
    Cart,
    /// External company page
    About,
}

impl Screen {
    /// All screens
    pub const ALL: [Self; 4] = [Self::Login, Self::Inventory, Self::Cart, Self::About];

    /// Path on the storefront, `None` for external screens
    #[must_use]
    pub const fn path(self) -> Option<&'static str> {
        match self {
            Self::Login => Some("/"),
            Self::Inventory => Some("/inventory.html"),
            Self::Cart => Some("/cart.html"),
            Self::About => None,
        }
    }

    /// Infer the screen from a URL; storefront screens must live under `base_url`
    #[must_use]
    pub fn from_url(url: &str, base_url: &str) -> Option<Self> {
        if about_pattern().is_match(url) {
            return Some(Self::About);
        }
        let rest = url.strip_prefix(base_url.trim_end_matches('/'))?;
        let path = rest.split(['?', '#']).next().unwrap_or_default();
        Self::ALL.into_iter().find(|screen| match screen.path() {
            Some("/") => path.is_empty() || path == "/",
            Some(p) => path == p,
            None => false,
        })
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Login => "login",
            Self::Inventory => "inventory",
            Self::Cart => "cart",
            Self::About => "about",
        })
    }
}

#[allow(clippy::expect_used)]
fn about_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https?://(www\.)?saucelabs\.com/?(?:[?#].*)?$")
            .expect("static about pattern")
    })
}

/// One low-level interaction inside a composite action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<K> {
    /// Click an element
    Click(K),
    /// Replace an input's value
    Fill(K, String),
    /// Choose an option by value
    Select(K, String),
    /// Load a URL
    Navigate(String),
}

impl<K: ElementName> fmt::Display for Step<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Click(k) => write!(f, "click {}", k.name()),
            Self::Fill(k, _) => write!(f, "fill {}", k.name()),
            Self::Select(k, v) => write!(f, "select {v} in {}", k.name()),
            Self::Navigate(url) => write!(f, "navigate {url}"),
        }
    }
}

/// Trait for page objects representing one screen of the storefront
#[async_trait]
pub trait PageObject: Send + Sync {
    /// Screen this page object drives
    fn screen(&self) -> Screen;

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Assert the screen is shown and ready for interaction
    async fn verify_loaded(&self) -> SwagResult<()>;
}

/// A screen's selector registry bound to one session's driver
pub struct Page<'a, K: ElementName, D: BrowserDriver> {
    driver: &'a D,
    registry: &'a SelectorRegistry<K>,
}

impl<K: ElementName, D: BrowserDriver> fmt::Debug for Page<'_, K, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("screen", &K::SCREEN)
            .field("driver", self.driver)
            .finish()
    }
}

impl<K: ElementName, D: BrowserDriver> Clone for Page<'_, K, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ElementName, D: BrowserDriver> Copy for Page<'_, K, D> {}

impl<'a, K: ElementName, D: BrowserDriver> Page<'a, K, D> {
    /// Bind a registry to a driver
    #[must_use]
    pub const fn new(driver: &'a D, registry: &'a SelectorRegistry<K>) -> Self {
        Self { driver, registry }
    }

    /// The session's driver
    #[must_use]
    pub const fn driver(&self) -> &'a D {
        self.driver
    }

    /// Resolve an element's selector
    pub fn selector(&self, key: K) -> SwagResult<&'a Selector> {
        self.registry.lookup(key)
    }

    /// Run a composite action one step at a time
    pub async fn perform(&self, steps: &[Step<K>]) -> SwagResult<()> {
        for (i, step) in steps.iter().enumerate() {
            tracing::debug!(screen = K::SCREEN, step = i + 1, of = steps.len(), "{step}");
            match step {
                Step::Click(k) => self.driver.click(self.selector(*k)?).await?,
                Step::Fill(k, value) => self.driver.fill(self.selector(*k)?, value).await?,
                Step::Select(k, value) => {
                    self.driver.select_option(self.selector(*k)?, value).await?;
                }
                Step::Navigate(url) => self.driver.navigate(url).await?,
            }
        }
        Ok(())
    }

    /// Click an element
    pub async fn click(&self, key: K) -> SwagResult<()> {
        self.perform(&[Step::Click(key)]).await
    }

    /// Rendered text of an element
    pub async fn text(&self, key: K) -> SwagResult<String> {
        self.driver.text(self.selector(key)?).await
    }

    /// Whether an element is rendered right now
    pub async fn is_visible(&self, key: K) -> SwagResult<bool> {
        self.driver.is_visible(self.selector(key)?).await
    }

    /// Assert an element becomes visible
    pub async fn expect_visible(&self, key: K) -> SwagResult<()> {
        self.driver
            .wait_for(self.selector(key)?, ElementState::Visible)
            .await
    }

    /// Assert an element is hidden or absent
    pub async fn expect_hidden(&self, key: K) -> SwagResult<()> {
        let selector = self.selector(key)?;
        match self.driver.wait_for(selector, ElementState::Hidden).await {
            Err(SwagError::ElementNotFound { timeout_ms, .. }) => Err(SwagError::assertion(
                format!(
                    "expected {} ({selector}) to be hidden, still visible after {timeout_ms}ms",
                    key.name()
                ),
            )),
            other => other,
        }
    }

    /// Assert exactly `expected` matches of an element are rendered
    pub async fn expect_count(&self, key: K, expected: usize) -> SwagResult<()> {
        let actual = self.driver.count_visible(self.selector(key)?).await?;
        if actual == expected {
            Ok(())
        } else {
            Err(SwagError::assertion(format!(
                "expected {expected} visible {}, found {actual}",
                key.name()
            )))
        }
    }

    /// Assert an element's text equals `expected` exactly
    pub async fn expect_text(&self, key: K, expected: &str) -> SwagResult<()> {
        let actual = self.text(key).await?;
        if actual == expected {
            Ok(())
        } else {
            Err(SwagError::assertion(format!(
                "expected {} to have text {expected:?}, got {actual:?}",
                key.name()
            )))
        }
    }

    /// Assert an element's attribute equals `expected` exactly
    pub async fn expect_attribute(&self, key: K, name: &str, expected: &str) -> SwagResult<()> {
        let actual = self.driver.attribute(self.selector(key)?, name).await?;
        if actual.as_deref() == Some(expected) {
            Ok(())
        } else {
            Err(SwagError::assertion(format!(
                "expected {} [{name}] to be {expected:?}, got {actual:?}",
                key.name()
            )))
        }
    }

    /// Assert an input's current value
    pub async fn expect_value(&self, key: K, expected: &str) -> SwagResult<()> {
        let actual = self.driver.input_value(self.selector(key)?).await?;
        if actual == expected {
            Ok(())
        } else {
            Err(SwagError::assertion(format!(
                "expected {} to have value {expected:?}, got {actual:?}",
                key.name()
            )))
        }
    }

    /// Assert the current URL maps to `screen` of the storefront at `base_url`
    pub async fn expect_screen(&self, screen: Screen, base_url: &str) -> SwagResult<()> {
        let url = self.driver.current_url().await?;
        match Screen::from_url(&url, base_url) {
            Some(actual) if actual == screen => Ok(()),
            actual => Err(SwagError::assertion(format!(
                "expected {screen} screen, url {url} is {}",
                actual.map_or_else(|| "unrecognised".to_string(), |s| format!("the {s} screen"))
            ))),
        }
    }

    /// Assert the current URL equals `expected` exactly
    pub async fn expect_url(&self, expected: &str) -> SwagResult<()> {
        let url = self.driver.current_url().await?;
        if url == expected {
            Ok(())
        } else {
            Err(SwagError::assertion(format!(
                "expected url {expected}, got {url}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod screen_tests {
        use super::*;

        const BASE: &str = "https://www.saucedemo.com";

        #[test]
        fn test_inventory_url() {
            assert_eq!(
                Screen::from_url("https://www.saucedemo.com/inventory.html", BASE),
                Some(Screen::Inventory)
            );
        }

        #[test]
        fn test_cart_url_under_custom_base() {
            assert_eq!(
                Screen::from_url("http://localhost:3000/cart.html", "http://localhost:3000/"),
                Some(Screen::Cart)
            );
            assert_eq!(Screen::from_url("http://localhost:3000/cart.html", BASE), None);
        }

        #[test]
        fn test_login_is_root() {
            assert_eq!(
                Screen::from_url("https://www.saucedemo.com/", BASE),
                Some(Screen::Login)
            );
            assert_eq!(
                Screen::from_url("https://www.saucedemo.com", BASE),
                Some(Screen::Login)
            );
            assert_eq!(
                Screen::from_url("https://www.saucedemo.com/?next=1", BASE),
                Some(Screen::Login)
            );
        }

        #[test]
        fn test_foreign_root_is_not_login() {
            assert_eq!(Screen::from_url("ftp://example", BASE), None);
            assert_eq!(Screen::from_url("https://evil.example/", BASE), None);
            assert_eq!(Screen::from_url("https://www.saucedemo.com.evil/", BASE), None);
        }

        #[test]
        fn test_about_url() {
            assert_eq!(Screen::from_url(ABOUT_URL, BASE), Some(Screen::About));
        }

        #[test]
        fn test_unknown_url() {
            assert_eq!(
                Screen::from_url("https://www.saucedemo.com/checkout-step-one.html", BASE),
                None
            );
        }

        #[test]
        fn test_inventory_item_page_is_not_inventory() {
            assert_eq!(
                Screen::from_url("https://www.saucedemo.com/inventory-item.html?id=4", BASE),
                None
            );
        }

        #[test]
        fn test_paths() {
            assert_eq!(Screen::Inventory.path(), Some("/inventory.html"));
            assert_eq!(Screen::About.path(), None);
        }
    }
}
