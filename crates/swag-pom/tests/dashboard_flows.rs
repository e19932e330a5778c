//! Inventory and cart flows against the simulated storefront.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use swag_pom::{
    dashboard_suite, CredentialResolver, Harness, InventoryPage, LoginPage, PageObject, Screen,
    SimulatedSessions, SimulatedStorefront, SortOrder, SuiteConfig, SwagError, UserCategory,
    ABOUT_URL,
};

const BASE: &str = "https://www.saucedemo.com";

async fn logged_in() -> SimulatedStorefront {
    let store = SimulatedStorefront::new();
    let credentials = CredentialResolver::new(SimulatedStorefront::credential_config());
    let login = LoginPage::new(&store, &credentials, BASE).unwrap();
    login.navigate().await.unwrap();
    login.login_as(UserCategory::Valid).await.unwrap();
    store
}

mod cart_tests {
    use super::*;

    #[tokio::test]
    async fn test_add_then_verify_added() {
        let store = logged_in().await;
        let inventory = InventoryPage::new(&store, BASE).unwrap();
        inventory.verify_loaded().await.unwrap();

        inventory.add_to_cart().await.unwrap();
        inventory.verify_product_added().await.unwrap();
        assert_eq!(store.cart_count(), 1);
    }

    #[tokio::test]
    async fn test_add_remove_then_verify_removed() {
        let store = logged_in().await;
        let inventory = InventoryPage::new(&store, BASE).unwrap();

        inventory.add_to_cart().await.unwrap();
        inventory.remove_from_cart().await.unwrap();
        inventory.verify_product_removed().await.unwrap();
    }

    #[tokio::test]
    async fn test_verify_added_on_empty_cart_times_out() {
        let store = logged_in().await;
        let inventory = InventoryPage::new(&store, BASE).unwrap();

        let err = inventory.verify_product_added().await.unwrap_err();
        assert!(matches!(
            err,
            SwagError::ElementNotFound { ref selector, .. } if selector == ".shopping_cart_badge"
        ));
    }

    #[tokio::test]
    async fn test_verify_removed_with_item_is_assertion() {
        let store = logged_in().await;
        let inventory = InventoryPage::new(&store, BASE).unwrap();
        inventory.add_to_cart().await.unwrap();

        let err = inventory.verify_product_removed().await.unwrap_err();
        assert!(matches!(err, SwagError::AssertionFailed { .. }));
    }

    #[tokio::test]
    async fn test_cart_and_back() {
        let store = logged_in().await;
        let inventory = InventoryPage::new(&store, BASE).unwrap();

        inventory.open_cart().await.unwrap();
        inventory.verify_shopping_cart_page().await.unwrap();
        inventory.assert_on_screen(Screen::Cart).await.unwrap();
        inventory.continue_shopping().await.unwrap();
        inventory.verify_page_loaded().await.unwrap();
    }

    #[tokio::test]
    async fn test_reset_empties_cart() {
        let store = logged_in().await;
        let inventory = InventoryPage::new(&store, BASE).unwrap();

        inventory.add_to_cart().await.unwrap();
        inventory.reset_state().await.unwrap();
        inventory.verify_cart_empty().await.unwrap();
        assert_eq!(store.cart_count(), 0);
    }
}

mod sort_tests {
    use super::*;

    #[tokio::test]
    async fn test_each_sort_sets_control_value() {
        let store = logged_in().await;
        let inventory = InventoryPage::new(&store, BASE).unwrap();

        for order in SortOrder::ALL {
            inventory.apply_sort(order).await.unwrap();
            inventory.verify_sort(order).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_sort_mismatch_is_assertion() {
        let store = logged_in().await;
        let inventory = InventoryPage::new(&store, BASE).unwrap();

        inventory.apply_sort(SortOrder::PriceDescending).await.unwrap();
        let err = inventory.verify_sort(SortOrder::NameAscending).await.unwrap_err();
        assert!(matches!(err, SwagError::AssertionFailed { .. }));
    }
}

mod menu_tests {
    use super::*;

    #[tokio::test]
    async fn test_open_and_close_menu() {
        let store = logged_in().await;
        let inventory = InventoryPage::new(&store, BASE).unwrap();

        inventory.open_menu().await.unwrap();
        inventory.verify_menu_opened().await.unwrap();
        inventory.close_menu().await.unwrap();
        inventory.verify_menu_closed().await.unwrap();
    }

    #[tokio::test]
    async fn test_menu_closed_while_open_is_assertion() {
        let store = logged_in().await;
        let inventory = InventoryPage::new(&store, BASE).unwrap();

        inventory.open_menu().await.unwrap();
        assert!(matches!(
            inventory.verify_menu_closed().await,
            Err(SwagError::AssertionFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_menu_links_click_open_toggle_first() {
        let store = logged_in().await;
        let inventory = InventoryPage::new(&store, BASE).unwrap();

        inventory.navigate_to_all_items().await.unwrap();
        inventory.verify_page_loaded().await.unwrap();

        let clicks: Vec<_> = store
            .history()
            .into_iter()
            .filter(|c| c.starts_with("click:"))
            .skip(1)
            .collect();
        assert_eq!(
            clicks,
            vec!["click:#react-burger-menu-btn", "click:#inventory_sidebar_link"]
        );
    }

    #[tokio::test]
    async fn test_about_leaves_storefront() {
        let store = logged_in().await;
        let inventory = InventoryPage::new(&store, BASE).unwrap();

        inventory.navigate_to_about().await.unwrap();
        inventory.verify_about_page().await.unwrap();
        inventory.assert_on_screen(Screen::About).await.unwrap();
        assert_eq!(store.history().last().map(String::as_str), Some("click:#about_sidebar_link"));
        assert_eq!(ABOUT_URL, "https://saucelabs.com/");
    }

    #[tokio::test]
    async fn test_logout_returns_to_login_form() {
        let store = logged_in().await;
        let inventory = InventoryPage::new(&store, BASE).unwrap();
        inventory.logout().await.unwrap();

        let credentials = CredentialResolver::new(SimulatedStorefront::credential_config());
        let login = LoginPage::new(&store, &credentials, BASE).unwrap();
        login.assert_on_login_form().await.unwrap();
        inventory.assert_on_screen(Screen::Login).await.unwrap();
    }
}

#[tokio::test]
async fn test_dashboard_suite_passes() {
    let config = SuiteConfig::new().with_credentials(SimulatedStorefront::credential_config());
    let report = Harness::new()
        .run(&SimulatedSessions::new(BASE), &config, dashboard_suite())
        .await
        .unwrap();

    assert_eq!(report.total(), 12);
    assert!(report.all_passed(), "failures: {:?}", report.failures());
    assert_eq!(report.expected_failure_count(), 0);
}
