//! In-memory model of the Swag Labs storefront.
//!
//! [`SimulatedStorefront`] implements [`BrowserDriver`] by tracking the
//! storefront's observable state (current URL, login form, cart, sort order,
//! side menu) and rendering each registered selector from it. It knows the
//! public demo accounts, reproduces the problem account's broken images and
//! the performance-glitch account's slow login, and records every driver
//! call for verification.

use crate::config::DEFAULT_BASE_URL;
use crate::credentials::{CredentialConfig, CredentialKey};
use crate::driver::{BrowserDriver, ElementState};
use crate::inventory_page::{
    inventory_selectors, InventoryElement, SortOrder, BACKPACK_IMAGE, KNOWN_DEFECT_IMAGE,
    MENU_LINKS,
};
use crate::login_page::{login_selectors, LoginElement, LoginErrorKind};
use crate::page_object::{Screen, ABOUT_URL};
use crate::result::{SwagError, SwagResult};
use crate::selector::{ElementName, Selector};
use crate::wait::{poll_until, WaitOptions};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Password shared by every demo account
pub const DEMO_PASSWORD: &str = "secret_sauce";

/// Standard demo account
pub const STANDARD_USER: &str = "standard_user";

/// Locked-out demo account
pub const LOCKED_OUT_USER: &str = "locked_out_user";

/// Problem demo account
pub const PROBLEM_USER: &str = "problem_user";

/// Performance-glitch demo account
pub const PERFORMANCE_GLITCH_USER: &str = "performance_glitch_user";

/// Default simulated login delay of the performance-glitch account
pub const DEFAULT_GLITCH_DELAY_MS: u64 = 3_500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Account {
    Standard,
    Problem,
    PerformanceGlitch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Login(LoginElement),
    Inventory(InventoryElement),
}

/// What the DOM shows for one element
#[derive(Debug, Clone, Default)]
struct View {
    visible: bool,
    text: String,
    value: Option<String>,
    src: Option<&'static str>,
}

impl View {
    fn shown(text: impl Into<String>) -> Self {
        Self {
            visible: true,
            text: text.into(),
            ..Self::default()
        }
    }

    fn hidden(text: impl Into<String>) -> Self {
        Self {
            visible: false,
            text: text.into(),
            ..Self::default()
        }
    }

    fn input(value: &str) -> Self {
        Self {
            visible: true,
            value: Some(value.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
struct StoreState {
    url: String,
    username: String,
    password: String,
    error: Option<LoginErrorKind>,
    redirect_error: Option<String>,
    account: Option<Account>,
    backpack_in_cart: bool,
    sort: SortOrder,
    menu_open: bool,
    history: Vec<String>,
}

enum LoginOutcome {
    Rejected(LoginErrorKind),
    Accepted(Account),
}

/// Simulated storefront driver
#[derive(Debug)]
pub struct SimulatedStorefront {
    base_url: String,
    wait: WaitOptions,
    glitch_delay: Duration,
    state: Mutex<StoreState>,
}

impl Default for SimulatedStorefront {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedStorefront {
    /// Create a storefront at the default URL, on a blank page
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            wait: WaitOptions::new().with_timeout(200).with_poll_interval(10),
            glitch_delay: Duration::from_millis(DEFAULT_GLITCH_DELAY_MS),
            state: Mutex::new(StoreState {
                url: "about:blank".to_string(),
                username: String::new(),
                password: String::new(),
                error: None,
                redirect_error: None,
                account: None,
                backpack_in_cart: false,
                sort: SortOrder::NameAscending,
                menu_open: false,
                history: Vec::new(),
            }),
        }
    }

    /// Serve the storefront at another URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the auto-wait bounds
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Set the performance-glitch account's login delay
    #[must_use]
    pub const fn with_glitch_delay(mut self, delay: Duration) -> Self {
        self.glitch_delay = delay;
        self
    }

    /// Credentials matching the demo accounts
    #[must_use]
    pub fn credential_config() -> CredentialConfig {
        CredentialConfig::new()
            .with(CredentialKey::ValidUsername, STANDARD_USER)
            .with(CredentialKey::ValidPassword, DEMO_PASSWORD)
            .with(CredentialKey::InvalidPassword, "not_the_sauce")
            .with(CredentialKey::LockedOutUsername, LOCKED_OUT_USER)
            .with(CredentialKey::ProblemUsername, PROBLEM_USER)
            .with(CredentialKey::PerformanceGlitchUsername, PERFORMANCE_GLITCH_USER)
    }

    /// Storefront URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Driver calls so far, oldest first
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock().map(|s| s.history.clone()).unwrap_or_default()
    }

    /// Check if a driver method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.history().iter().any(|c| c.starts_with(method))
    }

    /// Number of items in the cart
    #[must_use]
    pub fn cart_count(&self) -> usize {
        self.lock()
            .map(|s| usize::from(s.backpack_in_cart))
            .unwrap_or_default()
    }

    fn lock(&self) -> SwagResult<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|_| SwagError::browser("simulated storefront state poisoned"))
    }

    fn record(&self, call: String) -> SwagResult<()> {
        self.lock()?.history.push(call);
        Ok(())
    }

    fn page_url(&self, screen: Screen) -> String {
        match screen.path() {
            Some(path) => format!("{}{path}", self.base_url),
            None => ABOUT_URL.to_string(),
        }
    }

    fn resolve(selector: &Selector) -> SwagResult<Element> {
        let css = selector.to_css();
        let login = login_selectors()?;
        for key in LoginElement::ALL {
            if login.lookup(*key)?.to_css() == css {
                return Ok(Element::Login(*key));
            }
        }
        let inventory = inventory_selectors()?;
        for key in InventoryElement::ALL {
            if inventory.lookup(*key)?.to_css() == css {
                return Ok(Element::Inventory(*key));
            }
        }
        Err(SwagError::browser(format!(
            "selector {css} matches nothing the storefront renders"
        )))
    }

    fn screen_of(&self, url: &str) -> Option<Screen> {
        Screen::from_url(url, &self.base_url)
    }

    fn render(state: &StoreState, screen: Option<Screen>, element: Element) -> Option<View> {
        match (screen, element) {
            (Some(Screen::Login), Element::Login(e)) => Self::render_login(state, e),
            (Some(s @ (Screen::Inventory | Screen::Cart)), Element::Inventory(e)) => {
                Self::render_inventory(state, s == Screen::Cart, e)
            }
            _ => None,
        }
    }

    fn render_login(state: &StoreState, element: LoginElement) -> Option<View> {
        match element {
            LoginElement::UsernameInput => Some(View::input(&state.username)),
            LoginElement::PasswordInput => Some(View::input(&state.password)),
            LoginElement::LoginButton => Some(View::input("Login")),
            LoginElement::LoginLogo => Some(View::shown("Swag Labs")),
            LoginElement::ErrorMessage => state
                .error
                .map(|kind| kind.message().to_string())
                .or_else(|| state.redirect_error.clone())
                .map(View::shown),
        }
    }

    fn render_inventory(
        state: &StoreState,
        on_cart: bool,
        element: InventoryElement,
    ) -> Option<View> {
        use InventoryElement as E;

        let menu = |label: &str| {
            if state.menu_open {
                View::shown(label)
            } else {
                View::hidden(label)
            }
        };

        match element {
            E::AppLogo => Some(View::shown("Swag Labs")),
            E::Title => Some(View::shown(if on_cart { "Your Cart" } else { "Products" })),
            E::CartLink => Some(View::shown("")),
            E::CartBadge => state.backpack_in_cart.then(|| View::shown("1")),
            E::AddToCart => {
                (!on_cart && !state.backpack_in_cart).then(|| View::shown("Add to cart"))
            }
            E::RemoveFromCart => state.backpack_in_cart.then(|| View::shown("Remove")),
            E::SortSelect => (!on_cart).then(|| View::input(state.sort.code())),
            E::MenuOpen => Some(View::shown("Open Menu")),
            E::MenuClose => Some(menu("Close Menu")),
            E::MenuContainer => Some(menu("")),
            E::AllItemsLink => Some(menu(MENU_LINKS[0])),
            E::AboutLink => Some(menu(MENU_LINKS[1])),
            E::LogoutLink => Some(menu(MENU_LINKS[2])),
            E::ResetLink => Some(menu(MENU_LINKS[3])),
            E::MenuItems => Some(menu("")),
            E::ContinueShopping => on_cart.then(|| View::shown("Continue Shopping")),
            E::BackpackImage => (!on_cart).then(|| View {
                visible: true,
                src: Some(if state.account == Some(Account::Problem) {
                    KNOWN_DEFECT_IMAGE
                } else {
                    BACKPACK_IMAGE
                }),
                ..View::default()
            }),
        }
    }

    fn view(&self, selector: &Selector) -> SwagResult<Option<View>> {
        let element = Self::resolve(selector)?;
        let state = self.lock()?;
        Ok(Self::render(&state, self.screen_of(&state.url), element))
    }

    async fn wait_view(&self, selector: &Selector, state: ElementState) -> SwagResult<View> {
        self.wait_for(selector, state).await?;
        self.view(selector)?
            .ok_or_else(|| SwagError::browser(format!("{selector} detached")))
    }

    fn authenticate(username: &str, password: &str) -> LoginOutcome {
        if username.is_empty() {
            return LoginOutcome::Rejected(LoginErrorKind::EmptyUsername);
        }
        if password.is_empty() {
            return LoginOutcome::Rejected(LoginErrorKind::EmptyPassword);
        }
        if password != DEMO_PASSWORD {
            return LoginOutcome::Rejected(LoginErrorKind::InvalidCredentials);
        }
        match username {
            STANDARD_USER => LoginOutcome::Accepted(Account::Standard),
            PROBLEM_USER => LoginOutcome::Accepted(Account::Problem),
            PERFORMANCE_GLITCH_USER => LoginOutcome::Accepted(Account::PerformanceGlitch),
            LOCKED_OUT_USER => LoginOutcome::Rejected(LoginErrorKind::LockedOut),
            _ => LoginOutcome::Rejected(LoginErrorKind::InvalidCredentials),
        }
    }

    async fn submit_login(&self) -> SwagResult<()> {
        let outcome = {
            let state = self.lock()?;
            Self::authenticate(&state.username, &state.password)
        };

        match outcome {
            LoginOutcome::Rejected(kind) => {
                tracing::debug!(%kind, "simulated login rejected");
                let mut state = self.lock()?;
                state.error = Some(kind);
                state.redirect_error = None;
            }
            LoginOutcome::Accepted(account) => {
                if account == Account::PerformanceGlitch {
                    tokio::time::sleep(self.glitch_delay).await;
                }
                let url = self.page_url(Screen::Inventory);
                let mut state = self.lock()?;
                state.account = Some(account);
                state.error = None;
                state.redirect_error = None;
                state.menu_open = false;
                state.url = url;
            }
        }
        Ok(())
    }

    fn apply_click(&self, element: Element) -> SwagResult<()> {
        use InventoryElement as E;

        let next_url = match element {
            Element::Inventory(E::CartLink) => Some(self.page_url(Screen::Cart)),
            Element::Inventory(E::AllItemsLink | E::ContinueShopping) => {
                Some(self.page_url(Screen::Inventory))
            }
            Element::Inventory(E::AboutLink) => Some(ABOUT_URL.to_string()),
            Element::Inventory(E::LogoutLink) => Some(self.page_url(Screen::Login)),
            _ => None,
        };

        let mut state = self.lock()?;
        match element {
            Element::Inventory(E::AddToCart) => state.backpack_in_cart = true,
            Element::Inventory(E::RemoveFromCart | E::ResetLink) => {
                state.backpack_in_cart = false;
            }
            Element::Inventory(E::MenuOpen) => state.menu_open = true,
            Element::Inventory(E::MenuClose | E::AllItemsLink | E::AboutLink) => {
                state.menu_open = false;
            }
            Element::Inventory(E::LogoutLink) => {
                state.account = None;
                state.menu_open = false;
                state.username.clear();
                state.password.clear();
                state.error = None;
            }
            _ => {}
        }
        if let Some(url) = next_url {
            state.url = url;
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserDriver for SimulatedStorefront {
    async fn navigate(&self, url: &str) -> SwagResult<()> {
        self.record(format!("navigate:{url}"))?;
        let screen = self.screen_of(url);
        let mut state = self.lock()?;
        state.username.clear();
        state.password.clear();
        state.error = None;
        state.redirect_error = None;
        state.menu_open = false;

        match screen {
            Some(s @ (Screen::Inventory | Screen::Cart)) if state.account.is_none() => {
                state.url = self.page_url(Screen::Login);
                state.redirect_error = Some(format!(
                    "Epic sadface: You can only access '{}' when you are logged in.",
                    s.path().unwrap_or("/")
                ));
            }
            Some(_) => state.url = url.to_string(),
            None => {
                return Err(SwagError::Navigation {
                    url: url.to_string(),
                    message: "not served by the simulated storefront".to_string(),
                })
            }
        }
        Ok(())
    }

    async fn click(&self, selector: &Selector) -> SwagResult<()> {
        self.record(format!("click:{selector}"))?;
        let element = Self::resolve(selector)?;
        self.wait_for(selector, ElementState::Visible).await?;
        if element == Element::Login(LoginElement::LoginButton) {
            self.submit_login().await
        } else {
            self.apply_click(element)
        }
    }

    async fn fill(&self, selector: &Selector, value: &str) -> SwagResult<()> {
        self.record(format!("fill:{selector}"))?;
        let element = Self::resolve(selector)?;
        self.wait_for(selector, ElementState::Visible).await?;
        let mut state = self.lock()?;
        match element {
            Element::Login(LoginElement::UsernameInput) => state.username = value.to_string(),
            Element::Login(LoginElement::PasswordInput) => state.password = value.to_string(),
            _ => {
                return Err(SwagError::browser(format!(
                    "{selector} is not an editable input"
                )))
            }
        }
        Ok(())
    }

    async fn select_option(&self, selector: &Selector, value: &str) -> SwagResult<()> {
        self.record(format!("select:{selector}={value}"))?;
        let element = Self::resolve(selector)?;
        self.wait_for(selector, ElementState::Visible).await?;
        if element != Element::Inventory(InventoryElement::SortSelect) {
            return Err(SwagError::browser(format!("{selector} is not a <select>")));
        }
        let order: SortOrder = value
            .parse()
            .map_err(|_| SwagError::browser(format!("{selector} has no option {value:?}")))?;
        self.lock()?.sort = order;
        Ok(())
    }

    async fn text(&self, selector: &Selector) -> SwagResult<String> {
        Ok(self.wait_view(selector, ElementState::Attached).await?.text)
    }

    async fn is_visible(&self, selector: &Selector) -> SwagResult<bool> {
        Ok(self.view(selector)?.is_some_and(|v| v.visible))
    }

    async fn count_visible(&self, selector: &Selector) -> SwagResult<usize> {
        let element = Self::resolve(selector)?;
        if !self.view(selector)?.is_some_and(|v| v.visible) {
            return Ok(0);
        }
        Ok(match element {
            Element::Inventory(InventoryElement::MenuItems) => MENU_LINKS.len(),
            _ => 1,
        })
    }

    async fn attribute(&self, selector: &Selector, name: &str) -> SwagResult<Option<String>> {
        let view = self.wait_view(selector, ElementState::Attached).await?;
        Ok(match name {
            "src" => view.src.map(str::to_string),
            "value" => view.value,
            _ => None,
        })
    }

    async fn input_value(&self, selector: &Selector) -> SwagResult<String> {
        self.wait_view(selector, ElementState::Attached)
            .await?
            .value
            .ok_or_else(|| SwagError::browser(format!("{selector} is not an input or select")))
    }

    async fn wait_for(&self, selector: &Selector, state: ElementState) -> SwagResult<()> {
        let reached = poll_until(self.wait, || async {
            let view = self.view(selector)?;
            Ok(match state {
                ElementState::Attached => view.is_some(),
                ElementState::Visible => view.is_some_and(|v| v.visible),
                ElementState::Hidden => !view.is_some_and(|v| v.visible),
            })
        })
        .await?;

        if reached {
            Ok(())
        } else {
            Err(SwagError::ElementNotFound {
                selector: selector.to_css(),
                timeout_ms: self.wait.timeout_ms,
            })
        }
    }

    async fn current_url(&self) -> SwagResult<String> {
        Ok(self.lock()?.url.clone())
    }
}
