//! BrowserDriver - the capability set page objects depend on.
//!
//! Page objects only ever talk to a [`BrowserDriver`]. Two implementations
//! ship with the crate:
//!
//! - `ChromiumDriver` (feature `browser`) drives a real Chromium over CDP
//!   using chromiumoxide
//! - [`SimulatedStorefront`](crate::SimulatedStorefront) models the
//!   storefront in memory for unit tests and dry runs
//!
//! Element-level calls (`click`, `fill`, `select_option`, `text`,
//! `attribute`, `input_value`) auto-wait for their target up to the driver's
//! configured timeout and fail with
//! [`SwagError::ElementNotFound`](crate::SwagError::ElementNotFound)
//! afterwards. `is_visible` answers immediately.

use crate::result::SwagResult;
use crate::selector::Selector;
use async_trait::async_trait;
use std::fmt;

/// Element state a driver can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementState {
    /// Present in the DOM
    Attached,
    /// Present and rendered with a non-empty box
    Visible,
    /// Absent or not rendered
    Hidden,
}

impl fmt::Display for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Attached => "attached",
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        })
    }
}

/// Abstract driver trait for browser automation
#[async_trait]
pub trait BrowserDriver: Send + Sync + fmt::Debug {
    /// Navigate to URL and wait for the load to settle
    async fn navigate(&self, url: &str) -> SwagResult<()>;

    /// Click element
    async fn click(&self, selector: &Selector) -> SwagResult<()>;

    /// Replace the value of an input
    async fn fill(&self, selector: &Selector, value: &str) -> SwagResult<()>;

    /// Choose the `<option>` with the given value
    async fn select_option(&self, selector: &Selector, value: &str) -> SwagResult<()>;

    /// Rendered text of the element
    async fn text(&self, selector: &Selector) -> SwagResult<String>;

    /// Whether the element is currently rendered
    async fn is_visible(&self, selector: &Selector) -> SwagResult<bool>;

    /// Number of matching elements currently rendered
    async fn count_visible(&self, selector: &Selector) -> SwagResult<usize>;

    /// Attribute value, `None` when the attribute is absent
    async fn attribute(&self, selector: &Selector, name: &str) -> SwagResult<Option<String>>;

    /// Current value of an input or select
    async fn input_value(&self, selector: &Selector) -> SwagResult<String>;

    /// Wait until the element reaches `state`
    async fn wait_for(&self, selector: &Selector, state: ElementState) -> SwagResult<()>;

    /// Get current URL
    async fn current_url(&self) -> SwagResult<String>;
}
