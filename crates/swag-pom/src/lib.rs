//! swag-pom: Page Objects for the Swag Labs storefront
//!
//! Semantic page objects over a pluggable browser driver, configuration-driven
//! credential resolution, and the login/dashboard scenario catalog.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌───────────────┐   ┌────────────────┐
//! │ Scenario │──►│ Page Objects │──►│ BrowserDriver │──►│ Chromium (CDP) │
//! │ catalog  │   │ Login/Inv.   │   │    trait      │   │ or Simulator   │
//! └──────────┘   └──────┬───────┘   └───────────────┘   └────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   Selector registries      Credential resolver
//!   (one per screen)         (injected config)
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod config;
mod credentials;
mod driver;
mod harness;
mod inventory_page;
mod login_page;
mod page_object;
mod result;
mod scenario;
mod selector;
mod simulator;
mod wait;

/// Real browser control over CDP (requires the `browser` feature)
#[cfg(feature = "browser")]
pub mod chromium;

pub use config::{
    SuiteConfig, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_ELEMENT_TIMEOUT_MS,
    DEFAULT_NAVIGATION_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS, ELEMENT_TIMEOUT_ENV,
};
pub use credentials::{
    CredentialConfig, CredentialKey, CredentialResolver, Credentials, UserCategory,
};
pub use driver::{BrowserDriver, ElementState};
pub use harness::{
    check_credentials, validate_registries, Harness, Outcome, ScenarioResult, SessionFactory,
    SimulatedSessions, SuiteReport,
};
#[cfg(feature = "browser")]
pub use harness::ChromiumSessions;
pub use inventory_page::{
    build_inventory_selectors, inventory_selectors, InventoryElement, InventoryPage, SortOrder,
    BACKPACK_IMAGE, KNOWN_DEFECT_IMAGE, MENU_LINKS,
};
pub use login_page::{
    build_login_selectors, login_selectors, LoginElement, LoginErrorKind, LoginPage, LoginState,
};
pub use page_object::{Page, PageObject, Screen, Step, ABOUT_URL};
pub use result::{SwagError, SwagResult};
pub use scenario::{catalog, dashboard_suite, login_suite, Action, Scenario, Severity, Suite};
pub use selector::{ElementName, Selector, SelectorRegistry, SelectorRegistryBuilder};
pub use simulator::{
    SimulatedStorefront, DEFAULT_GLITCH_DELAY_MS, DEMO_PASSWORD, LOCKED_OUT_USER,
    PERFORMANCE_GLITCH_USER, PROBLEM_USER, STANDARD_USER,
};
#[cfg(feature = "browser")]
pub use chromium::ChromiumDriver;
pub use wait::{poll_until, WaitOptions};
