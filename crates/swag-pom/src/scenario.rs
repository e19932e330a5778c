//! Declarative scenario catalog.
//!
//! A [`Scenario`] is a list of [`Action`]s over the login and inventory page
//! objects. Each suite contributes setup actions that run first: the login
//! suite opens the login form, the dashboard suite also logs in as the valid
//! user. [`Scenario::run`] interprets the actions against one session's
//! driver and stops at the first error.

use crate::credentials::{CredentialResolver, UserCategory};
use crate::driver::BrowserDriver;
use crate::inventory_page::{InventoryPage, SortOrder};
use crate::login_page::{LoginErrorKind, LoginPage};
use crate::result::{SwagError, SwagResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// Scenario group sharing a setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suite {
    /// Login feature, starts on the login form
    Login,
    /// Dashboard functionality, starts logged in
    Dashboard,
}

impl Suite {
    /// All suites in run order
    pub const ALL: [Self; 2] = [Self::Login, Self::Dashboard];

    /// Actions every scenario of the suite starts with
    #[must_use]
    pub fn setup(self) -> Vec<Action> {
        match self {
            Self::Login => vec![Action::OpenLogin],
            Self::Dashboard => vec![Action::OpenLogin, Action::LoginAs(UserCategory::Valid)],
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Login => "login",
            Self::Dashboard => "dashboard",
        })
    }
}

impl FromStr for Suite {
    type Err = SwagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(Self::Login),
            "dashboard" => Ok(Self::Dashboard),
            other => Err(SwagError::Config {
                message: format!("unknown suite '{other}' (expected login or dashboard)"),
            }),
        }
    }
}

/// Severity annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Core flow
    Critical,
    /// Secondary flow
    Normal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Critical => "critical",
            Self::Normal => "normal",
        })
    }
}

/// One page-object action or assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Open the login form
    OpenLogin,
    /// Log in with the category's credentials
    LoginAs(UserCategory),
    /// Log in and wait for the product listing, bounding the elapsed time
    TimedLogin {
        /// Account category
        category: UserCategory,
        /// Exclusive lower bound in milliseconds
        min_ms: Option<u64>,
        /// Exclusive upper bound in milliseconds
        max_ms: u64,
    },
    /// The login form is displayed
    ExpectLoginForm,
    /// The login error banner shows this case's message
    ExpectLoginError(LoginErrorKind),
    /// The product listing is displayed
    ExpectInventoryLoaded,
    /// Add the backpack
    AddToCart,
    /// Remove the backpack
    RemoveFromCart,
    /// The backpack is in the cart
    ExpectProductAdded,
    /// The backpack left the cart
    ExpectProductRemoved,
    /// The cart badge is gone
    ExpectCartEmpty,
    /// Choose a sort order
    Sort(SortOrder),
    /// The sort control shows this order
    ExpectSort(SortOrder),
    /// Open the side menu
    OpenMenu,
    /// Close the side menu
    CloseMenu,
    /// The side menu shows its four links
    ExpectMenuOpened,
    /// The side menu is hidden
    ExpectMenuClosed,
    /// Menu: All Items
    MenuAllItems,
    /// Menu: About
    MenuAbout,
    /// Menu: Logout
    MenuLogout,
    /// Menu: Reset App State
    MenuResetState,
    /// Go to the cart
    OpenCart,
    /// Leave the cart
    ContinueShopping,
    /// The browser is on the company site
    ExpectAboutPage,
    /// The cart screen is displayed
    ExpectCartPage,
    /// The backpack shows the broken image
    ExpectKnownDefect,
    /// The backpack shows its real image
    ExpectUnknownDefect,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoginAs(c) => write!(f, "login as {c}"),
            Self::TimedLogin {
                category,
                min_ms,
                max_ms,
            } => match min_ms {
                Some(min) => write!(f, "login as {category} within {min}..{max_ms}ms"),
                None => write!(f, "login as {category} under {max_ms}ms"),
            },
            Self::ExpectLoginError(kind) => write!(f, "expect error {kind:?}"),
            Self::Sort(order) => write!(f, "sort {}", order.label()),
            Self::ExpectSort(order) => write!(f, "expect sort {order}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// A named, annotated sequence of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    /// Stable identifier
    pub name: &'static str,
    /// Human readable description
    pub title: &'static str,
    /// Owning suite
    pub suite: Suite,
    /// Severity annotation
    pub severity: Severity,
    /// Failure is the expected verdict while a known defect exists
    pub expect_failure: bool,
    /// Actions after the suite setup
    pub actions: Vec<Action>,
}

impl Scenario {
    fn new(
        suite: Suite,
        severity: Severity,
        name: &'static str,
        title: &'static str,
        actions: Vec<Action>,
    ) -> Self {
        Self {
            name,
            title,
            suite,
            severity,
            expect_failure: false,
            actions,
        }
    }

    fn expected_to_fail(mut self) -> Self {
        self.expect_failure = true;
        self
    }

    /// Suite setup followed by the scenario's own actions
    #[must_use]
    pub fn steps(&self) -> Vec<Action> {
        let mut steps = self.suite.setup();
        steps.extend(self.actions.iter().cloned());
        steps
    }

    /// Account categories the scenario logs in with, in first-use order
    #[must_use]
    pub fn categories(&self) -> Vec<UserCategory> {
        let mut categories = Vec::new();
        for action in self.steps() {
            let category = match action {
                Action::LoginAs(c) | Action::TimedLogin { category: c, .. } => c,
                _ => continue,
            };
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        categories
    }

    /// Case-insensitive substring match on name or title
    #[must_use]
    pub fn matches(&self, filter: &str) -> bool {
        let filter = filter.to_lowercase();
        self.name.contains(&filter) || self.title.to_lowercase().contains(&filter)
    }

    /// Interpret the scenario against one session
    pub async fn run<D: BrowserDriver>(
        &self,
        driver: &D,
        credentials: &CredentialResolver,
        base_url: &str,
    ) -> SwagResult<()> {
        let login = LoginPage::new(driver, credentials, base_url)?;
        let inventory = InventoryPage::new(driver, base_url)?;

        for (i, action) in self.steps().iter().enumerate() {
            tracing::debug!(scenario = self.name, step = i + 1, "{action}");
            apply(&login, &inventory, action).await?;
        }
        Ok(())
    }
}

async fn apply<D: BrowserDriver>(
    login: &LoginPage<'_, D>,
    inventory: &InventoryPage<'_, D>,
    action: &Action,
) -> SwagResult<()> {
    match action {
        Action::OpenLogin => login.navigate().await,
        Action::LoginAs(category) => login.login_as(*category).await,
        Action::TimedLogin {
            category,
            min_ms,
            max_ms,
        } => {
            let start = Instant::now();
            login.login_as(*category).await?;
            inventory.verify_page_loaded().await?;
            let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            tracing::info!(%category, elapsed_ms = elapsed, "timed login");

            let too_fast = min_ms.is_some_and(|min| elapsed <= min);
            if too_fast || elapsed >= *max_ms {
                return Err(SwagError::assertion(format!(
                    "login as {category} took {elapsed}ms, outside {}..{max_ms}ms",
                    min_ms.unwrap_or(0)
                )));
            }
            Ok(())
        }
        Action::ExpectLoginForm => login.assert_on_login_form().await,
        Action::ExpectLoginError(kind) => login.assert_error(*kind).await,
        Action::ExpectInventoryLoaded => inventory.verify_page_loaded().await,
        Action::AddToCart => inventory.add_to_cart().await,
        Action::RemoveFromCart => inventory.remove_from_cart().await,
        Action::ExpectProductAdded => inventory.verify_product_added().await,
        Action::ExpectProductRemoved => inventory.verify_product_removed().await,
        Action::ExpectCartEmpty => inventory.verify_cart_empty().await,
        Action::Sort(order) => inventory.apply_sort(*order).await,
        Action::ExpectSort(order) => inventory.verify_sort(*order).await,
        Action::OpenMenu => inventory.open_menu().await,
        Action::CloseMenu => inventory.close_menu().await,
        Action::ExpectMenuOpened => inventory.verify_menu_opened().await,
        Action::ExpectMenuClosed => inventory.verify_menu_closed().await,
        Action::MenuAllItems => inventory.navigate_to_all_items().await,
        Action::MenuAbout => inventory.navigate_to_about().await,
        Action::MenuLogout => inventory.logout().await,
        Action::MenuResetState => inventory.reset_state().await,
        Action::OpenCart => inventory.open_cart().await,
        Action::ContinueShopping => inventory.continue_shopping().await,
        Action::ExpectAboutPage => inventory.verify_about_page().await,
        Action::ExpectCartPage => inventory.verify_shopping_cart_page().await,
        Action::ExpectKnownDefect => inventory.assert_known_defect().await,
        Action::ExpectUnknownDefect => inventory.assert_unknown_defect().await,
    }
}

/// Login feature scenarios
#[must_use]
pub fn login_suite() -> Vec<Scenario> {
    use Action as A;
    use Severity::{Critical, Normal};
    use UserCategory as U;

    let s = |severity, name, title, actions| {
        Scenario::new(Suite::Login, severity, name, title, actions)
    };

    vec![
        s(
            Critical,
            "valid-login",
            "valid user logs in",
            vec![A::LoginAs(U::Valid), A::ExpectInventoryLoaded],
        ),
        s(
            Critical,
            "invalid-user",
            "invalid user sees an error",
            vec![
                A::LoginAs(U::Invalid),
                A::ExpectLoginError(LoginErrorKind::InvalidCredentials),
            ],
        ),
        s(
            Critical,
            "empty-credentials",
            "empty credentials are rejected",
            vec![
                A::LoginAs(U::Empty),
                A::ExpectLoginError(LoginErrorKind::EmptyCredentials),
            ],
        ),
        s(
            Critical,
            "empty-username",
            "empty username is rejected",
            vec![
                A::LoginAs(U::EmptyUsername),
                A::ExpectLoginError(LoginErrorKind::EmptyUsername),
            ],
        ),
        s(
            Critical,
            "empty-password",
            "empty password is rejected",
            vec![
                A::LoginAs(U::EmptyPassword),
                A::ExpectLoginError(LoginErrorKind::EmptyPassword),
            ],
        ),
        s(
            Critical,
            "locked-out-user",
            "locked out user is rejected",
            vec![
                A::LoginAs(U::LockedOut),
                A::ExpectLoginError(LoginErrorKind::LockedOut),
            ],
        ),
        s(
            Normal,
            "problem-user-expected",
            "problem user logs in (expected case)",
            vec![
                A::LoginAs(U::Problem),
                A::ExpectInventoryLoaded,
                A::ExpectKnownDefect,
            ],
        ),
        s(
            Critical,
            "problem-user-unexpected",
            "problem user logs in (unexpected case)",
            vec![
                A::LoginAs(U::Problem),
                A::ExpectInventoryLoaded,
                A::ExpectUnknownDefect,
            ],
        )
        .expected_to_fail(),
        s(
            Normal,
            "performance-glitch-expected",
            "performance glitch user logs in (expected case)",
            vec![A::TimedLogin {
                category: U::PerformanceGlitch,
                min_ms: Some(3_000),
                max_ms: 10_001,
            }],
        ),
        s(
            Normal,
            "performance-glitch-unexpected",
            "performance glitch user logs in (unexpected case)",
            vec![A::TimedLogin {
                category: U::PerformanceGlitch,
                min_ms: None,
                max_ms: 2_000,
            }],
        )
        .expected_to_fail(),
    ]
}

/// Dashboard functionality scenarios
#[must_use]
pub fn dashboard_suite() -> Vec<Scenario> {
    use Action as A;
    use Severity::{Critical, Normal};

    let s = |severity, name, title, actions| {
        Scenario::new(Suite::Dashboard, severity, name, title, actions)
    };
    let sort = |name, title, order| {
        s(Normal, name, title, vec![A::Sort(order), A::ExpectSort(order)])
    };

    vec![
        s(
            Critical,
            "add-to-cart",
            "add product to the cart",
            vec![A::AddToCart, A::ExpectProductAdded],
        ),
        s(
            Critical,
            "remove-from-cart",
            "remove product from the cart",
            vec![A::AddToCart, A::RemoveFromCart, A::ExpectProductRemoved],
        ),
        sort("sort-az", "sort products from A to Z", SortOrder::NameAscending),
        sort("sort-za", "sort products from Z to A", SortOrder::NameDescending),
        sort(
            "sort-lohi",
            "sort products by price, low to high",
            SortOrder::PriceAscending,
        ),
        sort(
            "sort-hilo",
            "sort products by price, high to low",
            SortOrder::PriceDescending,
        ),
        s(
            Normal,
            "menu-open-close",
            "open and close the side menu",
            vec![
                A::OpenMenu,
                A::ExpectMenuOpened,
                A::CloseMenu,
                A::ExpectMenuClosed,
            ],
        ),
        s(
            Normal,
            "menu-all-items",
            "All Items via the side menu",
            vec![A::MenuAllItems, A::ExpectInventoryLoaded],
        ),
        s(
            Normal,
            "menu-about",
            "About via the side menu",
            vec![A::MenuAbout, A::ExpectAboutPage],
        ),
        s(
            Critical,
            "menu-logout",
            "log out via the side menu",
            vec![A::MenuLogout, A::ExpectLoginForm],
        ),
        s(
            Normal,
            "menu-reset",
            "reset app state via the side menu",
            vec![A::AddToCart, A::MenuResetState, A::ExpectCartEmpty],
        ),
        s(
            Critical,
            "cart-and-back",
            "shopping cart and back",
            vec![
                A::OpenCart,
                A::ExpectCartPage,
                A::ContinueShopping,
                A::ExpectInventoryLoaded,
            ],
        ),
    ]
}

/// Every scenario, login suite first
#[must_use]
pub fn catalog() -> Vec<Scenario> {
    let mut all = login_suite();
    all.extend(dashboard_suite());
    all
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    mod catalog_tests {
        use super::*;

        #[test]
        fn test_suite_sizes() {
            assert_eq!(login_suite().len(), 10);
            assert_eq!(dashboard_suite().len(), 12);
            assert_eq!(catalog().len(), 22);
        }

        #[test]
        fn test_names_unique() {
            let names: HashSet<_> = catalog().iter().map(|s| s.name).collect();
            assert_eq!(names.len(), 22);
        }

        #[test]
        fn test_expected_failures() {
            let xfail: Vec<_> = catalog()
                .into_iter()
                .filter(|s| s.expect_failure)
                .map(|s| s.name)
                .collect();
            assert_eq!(xfail, vec!["problem-user-unexpected", "performance-glitch-unexpected"]);
        }

        #[test]
        fn test_dashboard_starts_logged_in() {
            let steps = dashboard_suite()[0].steps();
            assert_eq!(steps[0], Action::OpenLogin);
            assert_eq!(steps[1], Action::LoginAs(UserCategory::Valid));
            assert_eq!(steps[2], Action::AddToCart);
        }

        #[test]
        fn test_categories_cover_setup_and_timed_logins() {
            let all = catalog();
            let find = |name: &str| all.iter().find(|s| s.name == name).unwrap().categories();
            assert_eq!(find("menu-logout"), vec![UserCategory::Valid]);
            assert_eq!(find("empty-credentials"), vec![UserCategory::Empty]);
            assert_eq!(
                find("performance-glitch-expected"),
                vec![UserCategory::PerformanceGlitch]
            );
        }

        #[test]
        fn test_filter_matches_title_case_insensitively() {
            let all = catalog();
            let hits: Vec<_> = all.iter().filter(|s| s.matches("SIDE MENU")).collect();
            assert_eq!(hits.len(), 5);
        }
    }

    mod suite_tests {
        use super::*;

        #[test]
        fn test_parse_suite() {
            assert_eq!("login".parse::<Suite>().unwrap(), Suite::Login);
            assert_eq!("dashboard".parse::<Suite>().unwrap(), Suite::Dashboard);
            assert!(matches!(
                "checkout".parse::<Suite>(),
                Err(SwagError::Config { .. })
            ));
        }

        #[test]
        fn test_action_display() {
            let action = Action::TimedLogin {
                category: UserCategory::PerformanceGlitch,
                min_ms: Some(3000),
                max_ms: 10001,
            };
            assert_eq!(action.to_string(), "login as performance_glitch within 3000..10001ms");
            assert_eq!(
                Action::Sort(SortOrder::PriceAscending).to_string(),
                "sort Price (low to high)"
            );
        }
    }
}
