//! Inventory (product listing and cart) page object.

use crate::driver::BrowserDriver;
use crate::page_object::{Page, PageObject, Screen, Step, ABOUT_URL};
use crate::result::SwagResult;
use crate::selector::{ElementName, Selector, SelectorRegistry};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Image the problem account renders for every product
pub const KNOWN_DEFECT_IMAGE: &str = "/static/media/sl-404.168b1cce.jpg";

/// Image a healthy account renders for the backpack
pub const BACKPACK_IMAGE: &str = "/static/media/sauce-backpack-1200x1500.0a0b85a3.jpg";

/// Labels of the side menu links, top to bottom
pub const MENU_LINKS: [&str; 4] = ["All Items", "About", "Logout", "Reset App State"];

/// Elements of the inventory and cart screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InventoryElement {
    /// Header logo
    AppLogo,
    /// Screen title ("Products", "Your Cart")
    Title,
    /// Backpack "Add to cart" button
    AddToCart,
    /// Backpack "Remove" button
    RemoveFromCart,
    /// Item count on the cart icon
    CartBadge,
    /// Cart icon
    CartLink,
    /// Product sort dropdown
    SortSelect,
    /// Burger button opening the side menu
    MenuOpen,
    /// Cross button closing the side menu
    MenuClose,
    /// Side menu panel
    MenuContainer,
    /// "All Items" menu link
    AllItemsLink,
    /// "About" menu link
    AboutLink,
    /// "Logout" menu link
    LogoutLink,
    /// "Reset App State" menu link
    ResetLink,
    /// Every link in the side menu
    MenuItems,
    /// "Continue Shopping" button on the cart screen
    ContinueShopping,
    /// Backpack product image
    BackpackImage,
}

impl ElementName for InventoryElement {
    const SCREEN: &'static str = "inventory";
    const ALL: &'static [Self] = &[
        Self::AppLogo,
        Self::Title,
        Self::AddToCart,
        Self::RemoveFromCart,
        Self::CartBadge,
        Self::CartLink,
        Self::SortSelect,
        Self::MenuOpen,
        Self::MenuClose,
        Self::MenuContainer,
        Self::AllItemsLink,
        Self::AboutLink,
        Self::LogoutLink,
        Self::ResetLink,
        Self::MenuItems,
        Self::ContinueShopping,
        Self::BackpackImage,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::AppLogo => "app_logo",
            Self::Title => "title",
            Self::AddToCart => "add_to_cart",
            Self::RemoveFromCart => "remove_from_cart",
            Self::CartBadge => "cart_badge",
            Self::CartLink => "cart_link",
            Self::SortSelect => "sort_select",
            Self::MenuOpen => "menu_open",
            Self::MenuClose => "menu_close",
            Self::MenuContainer => "menu_container",
            Self::AllItemsLink => "all_items_link",
            Self::AboutLink => "about_link",
            Self::LogoutLink => "logout_link",
            Self::ResetLink => "reset_link",
            Self::MenuItems => "menu_items",
            Self::ContinueShopping => "continue_shopping",
            Self::BackpackImage => "backpack_image",
        }
    }
}

/// Build the inventory screen registry
pub fn build_inventory_selectors() -> SwagResult<SelectorRegistry<InventoryElement>> {
    use InventoryElement as E;

    SelectorRegistry::builder()
        .with(E::AppLogo, Selector::css(".app_logo"))
        .with(E::Title, Selector::css(".title"))
        .with(E::AddToCart, Selector::data_test("add-to-cart-sauce-labs-backpack"))
        .with(E::RemoveFromCart, Selector::data_test("remove-sauce-labs-backpack"))
        .with(E::CartBadge, Selector::css(".shopping_cart_badge"))
        .with(E::CartLink, Selector::css(".shopping_cart_link"))
        .with(E::SortSelect, Selector::data_test("product-sort-container"))
        .with(E::MenuOpen, Selector::id("react-burger-menu-btn"))
        .with(E::MenuClose, Selector::id("react-burger-cross-btn"))
        .with(E::MenuContainer, Selector::css(".bm-menu-wrap"))
        .with(E::AllItemsLink, Selector::id("inventory_sidebar_link"))
        .with(E::AboutLink, Selector::id("about_sidebar_link"))
        .with(E::LogoutLink, Selector::id("logout_sidebar_link"))
        .with(E::ResetLink, Selector::id("reset_sidebar_link"))
        .with(E::MenuItems, Selector::css(".bm-item-list a"))
        .with(E::ContinueShopping, Selector::data_test("continue-shopping"))
        .with(
            E::BackpackImage,
            Selector::data_test("inventory-item-sauce-labs-backpack-img"),
        )
        .build()
}

/// Process-wide inventory registry, built on first use
pub fn inventory_selectors() -> SwagResult<&'static SelectorRegistry<InventoryElement>> {
    static REGISTRY: OnceLock<SelectorRegistry<InventoryElement>> = OnceLock::new();
    if let Some(registry) = REGISTRY.get() {
        return Ok(registry);
    }
    let built = build_inventory_selectors()?;
    Ok(REGISTRY.get_or_init(|| built))
}

/// Product sort orders offered by the dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Name (A to Z)
    NameAscending,
    /// Name (Z to A)
    NameDescending,
    /// Price (low to high)
    PriceAscending,
    /// Price (high to low)
    PriceDescending,
}

impl SortOrder {
    /// All orders, in dropdown order
    pub const ALL: [Self; 4] = [
        Self::NameAscending,
        Self::NameDescending,
        Self::PriceAscending,
        Self::PriceDescending,
    ];

    /// `<option>` value
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NameAscending => "az",
            Self::NameDescending => "za",
            Self::PriceAscending => "lohi",
            Self::PriceDescending => "hilo",
        }
    }

    /// `<option>` label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NameAscending => "Name (A to Z)",
            Self::NameDescending => "Name (Z to A)",
            Self::PriceAscending => "Price (low to high)",
            Self::PriceDescending => "Price (high to low)",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SortOrder {
    type Err = crate::SwagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.code() == s)
            .ok_or_else(|| crate::SwagError::Config {
                message: format!("unknown sort order '{s}'"),
            })
    }
}

/// Page object for the product listing and cart
#[derive(Debug)]
pub struct InventoryPage<'a, D: BrowserDriver> {
    page: Page<'a, InventoryElement, D>,
    base_url: String,
}

impl<'a, D: BrowserDriver> InventoryPage<'a, D> {
    /// Create the page object for one session of the storefront at `base_url`
    pub fn new(driver: &'a D, base_url: impl Into<String>) -> SwagResult<Self> {
        Ok(Self {
            page: Page::new(driver, inventory_selectors()?),
            base_url: base_url.into(),
        })
    }

    // --- ACTIONS ---

    /// Put the backpack in the cart
    pub async fn add_to_cart(&self) -> SwagResult<()> {
        self.page.perform(&[Step::Click(InventoryElement::AddToCart)]).await
    }

    /// Take the backpack out of the cart
    pub async fn remove_from_cart(&self) -> SwagResult<()> {
        self.page
            .perform(&[Step::Click(InventoryElement::RemoveFromCart)])
            .await
    }

    /// Choose a sort order in the dropdown
    pub async fn apply_sort(&self, order: SortOrder) -> SwagResult<()> {
        tracing::debug!(%order, "apply sort");
        self.page
            .perform(&[Step::Select(
                InventoryElement::SortSelect,
                order.code().to_string(),
            )])
            .await
    }

    /// Open the side menu
    pub async fn open_menu(&self) -> SwagResult<()> {
        self.page.perform(&[Step::Click(InventoryElement::MenuOpen)]).await
    }

    /// Close the side menu
    pub async fn close_menu(&self) -> SwagResult<()> {
        self.page.perform(&[Step::Click(InventoryElement::MenuClose)]).await
    }

    /// Go to the product listing through the side menu
    pub async fn navigate_to_all_items(&self) -> SwagResult<()> {
        self.page
            .perform(&Self::via_menu(InventoryElement::AllItemsLink))
            .await
    }

    /// Go to the About page through the side menu
    pub async fn navigate_to_about(&self) -> SwagResult<()> {
        self.page
            .perform(&Self::via_menu(InventoryElement::AboutLink))
            .await
    }

    /// Log out through the side menu
    pub async fn logout(&self) -> SwagResult<()> {
        self.page
            .perform(&Self::via_menu(InventoryElement::LogoutLink))
            .await
    }

    /// Reset the app state through the side menu
    pub async fn reset_state(&self) -> SwagResult<()> {
        self.page
            .perform(&Self::via_menu(InventoryElement::ResetLink))
            .await
    }

    /// Open the shopping cart
    pub async fn open_cart(&self) -> SwagResult<()> {
        self.page.perform(&[Step::Click(InventoryElement::CartLink)]).await
    }

    /// Leave the cart for the product listing
    pub async fn continue_shopping(&self) -> SwagResult<()> {
        self.page
            .perform(&[Step::Click(InventoryElement::ContinueShopping)])
            .await
    }

    fn via_menu(link: InventoryElement) -> [Step<InventoryElement>; 2] {
        [Step::Click(InventoryElement::MenuOpen), Step::Click(link)]
    }

    // --- ASSERTIONS ---

    /// The product listing is displayed
    pub async fn verify_page_loaded(&self) -> SwagResult<()> {
        self.page.expect_visible(InventoryElement::AppLogo).await?;
        self.page.expect_text(InventoryElement::Title, "Products").await?;
        self.page.expect_screen(Screen::Inventory, &self.base_url).await
    }

    /// Badge shows one item and the backpack offers "Remove"
    pub async fn verify_product_added(&self) -> SwagResult<()> {
        self.page.expect_visible(InventoryElement::CartBadge).await?;
        self.page.expect_text(InventoryElement::CartBadge, "1").await?;
        self.page.expect_visible(InventoryElement::RemoveFromCart).await
    }

    /// Badge is gone and the backpack offers "Add to cart" again
    pub async fn verify_product_removed(&self) -> SwagResult<()> {
        self.page.expect_hidden(InventoryElement::CartBadge).await?;
        self.page.expect_visible(InventoryElement::AddToCart).await
    }

    /// The cart badge is hidden
    pub async fn verify_cart_empty(&self) -> SwagResult<()> {
        self.page.expect_hidden(InventoryElement::CartBadge).await
    }

    /// The dropdown reports `order`
    pub async fn verify_sort(&self, order: SortOrder) -> SwagResult<()> {
        self.page
            .expect_value(InventoryElement::SortSelect, order.code())
            .await
    }

    /// The side menu shows its four links
    pub async fn verify_menu_opened(&self) -> SwagResult<()> {
        // exactly these four, in this order
        let links = [
            InventoryElement::AllItemsLink,
            InventoryElement::AboutLink,
            InventoryElement::LogoutLink,
            InventoryElement::ResetLink,
        ];
        for (link, label) in links.into_iter().zip(MENU_LINKS) {
            self.page.expect_visible(link).await?;
            self.page.expect_text(link, label).await?;
        }
        self.page
            .expect_count(InventoryElement::MenuItems, MENU_LINKS.len())
            .await
    }

    /// The side menu and its close toggle are hidden
    pub async fn verify_menu_closed(&self) -> SwagResult<()> {
        self.page.expect_hidden(InventoryElement::MenuContainer).await?;
        self.page.expect_hidden(InventoryElement::MenuClose).await
    }

    /// The browser left for the company About page
    pub async fn verify_about_page(&self) -> SwagResult<()> {
        self.page.expect_url(ABOUT_URL).await
    }

    /// The cart is displayed
    pub async fn verify_shopping_cart_page(&self) -> SwagResult<()> {
        self.page.expect_screen(Screen::Cart, &self.base_url).await?;
        self.page.expect_text(InventoryElement::Title, "Your Cart").await
    }

    /// The current URL maps to `screen`
    pub async fn assert_on_screen(&self, screen: Screen) -> SwagResult<()> {
        self.page.expect_screen(screen, &self.base_url).await
    }

    /// The problem account still renders the broken image
    pub async fn assert_known_defect(&self) -> SwagResult<()> {
        self.page
            .expect_attribute(InventoryElement::BackpackImage, "src", KNOWN_DEFECT_IMAGE)
            .await
    }

    /// The backpack renders its real image; fails while the defect exists
    pub async fn assert_unknown_defect(&self) -> SwagResult<()> {
        self.page
            .expect_attribute(InventoryElement::BackpackImage, "src", BACKPACK_IMAGE)
            .await
    }
}

#[async_trait]
impl<'a, D: BrowserDriver> PageObject for InventoryPage<'a, D> {
    fn screen(&self) -> Screen {
        Screen::Inventory
    }

    async fn verify_loaded(&self) -> SwagResult<()> {
        self.verify_page_loaded().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_complete() {
        let registry = inventory_selectors().unwrap();
        assert_eq!(registry.len(), InventoryElement::ALL.len());
        assert_eq!(
            registry.lookup_by_name("menu_open").unwrap().to_css(),
            "#react-burger-menu-btn"
        );
    }

    #[test]
    fn test_sort_codes() {
        let codes: Vec<_> = SortOrder::ALL.iter().map(|o| o.code()).collect();
        assert_eq!(codes, vec!["az", "za", "lohi", "hilo"]);
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!("hilo".parse::<SortOrder>().unwrap(), SortOrder::PriceDescending);
        assert!("price".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_menu_steps_open_menu_first() {
        let steps =
            InventoryPage::<crate::SimulatedStorefront>::via_menu(InventoryElement::LogoutLink);
        assert_eq!(steps[0], Step::Click(InventoryElement::MenuOpen));
        assert_eq!(steps[1], Step::Click(InventoryElement::LogoutLink));
    }
}
