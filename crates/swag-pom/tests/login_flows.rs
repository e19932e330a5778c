//! Login flows against the simulated storefront.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;
use swag_pom::{
    login_suite, CredentialConfig, CredentialKey, CredentialResolver, Harness, InventoryPage,
    LoginErrorKind, LoginPage, LoginState, Outcome, PageObject, Screen, SimulatedSessions,
    SimulatedStorefront, SuiteConfig, SwagError, UserCategory,
};

const BASE: &str = "https://www.saucedemo.com";

fn resolver() -> CredentialResolver {
    CredentialResolver::new(SimulatedStorefront::credential_config())
}

fn storefront() -> SimulatedStorefront {
    SimulatedStorefront::new().with_glitch_delay(Duration::ZERO)
}

async fn attempt(store: &SimulatedStorefront, category: UserCategory) -> LoginState {
    let credentials = resolver();
    let login = LoginPage::new(store, &credentials, BASE).unwrap();
    login.navigate().await.unwrap();
    login.verify_loaded().await.unwrap();
    login.login_as(category).await.unwrap();
    login.state().await.unwrap()
}

#[tokio::test]
async fn test_valid_login_reaches_inventory() {
    let store = storefront();
    assert_eq!(attempt(&store, UserCategory::Valid).await, LoginState::Authenticated);

    let inventory = InventoryPage::new(&store, BASE).unwrap();
    inventory.verify_page_loaded().await.unwrap();
    inventory.assert_on_screen(Screen::Inventory).await.unwrap();
    inventory.assert_unknown_defect().await.unwrap();
}

#[tokio::test]
async fn test_rejections_show_exact_messages() {
    let cases = [
        (UserCategory::Invalid, LoginErrorKind::InvalidCredentials),
        (UserCategory::Empty, LoginErrorKind::EmptyCredentials),
        (UserCategory::EmptyUsername, LoginErrorKind::EmptyUsername),
        (UserCategory::EmptyPassword, LoginErrorKind::EmptyPassword),
        (UserCategory::LockedOut, LoginErrorKind::LockedOut),
    ];

    for (category, kind) in cases {
        let store = storefront();
        let state = attempt(&store, category).await;
        assert_eq!(state, LoginState::Error(kind.message().to_string()), "{category}");

        let credentials = resolver();
        let login = LoginPage::new(&store, &credentials, BASE).unwrap();
        login.assert_error(kind).await.unwrap();
    }
}

#[tokio::test]
async fn test_convenience_assertions() {
    let credentials = resolver();

    let store = storefront();
    attempt(&store, UserCategory::LockedOut).await;
    let login = LoginPage::new(&store, &credentials, BASE).unwrap();
    login.verify_locked_out_user().await.unwrap();
    assert!(matches!(
        login.verify_invalid_user().await,
        Err(SwagError::AssertionFailed { .. })
    ));

    let store = storefront();
    attempt(&store, UserCategory::EmptyPassword).await;
    let login = LoginPage::new(&store, &credentials, BASE).unwrap();
    login.verify_empty_password().await.unwrap();

    let store = storefront();
    attempt(&store, UserCategory::EmptyUsername).await;
    let login = LoginPage::new(&store, &credentials, BASE).unwrap();
    login.verify_empty_username().await.unwrap();
    login.verify_empty_credentials().await.unwrap();
}

#[tokio::test]
async fn test_problem_user_shows_known_defect() {
    let store = storefront();
    attempt(&store, UserCategory::Problem).await;
    let inventory = InventoryPage::new(&store, BASE).unwrap();
    inventory.verify_page_loaded().await.unwrap();
    inventory.assert_known_defect().await.unwrap();
    assert!(matches!(
        inventory.assert_unknown_defect().await,
        Err(SwagError::AssertionFailed { .. })
    ));
}

#[tokio::test]
async fn test_missing_configuration_surfaces_before_typing() {
    let store = storefront();
    let credentials = CredentialResolver::new(
        CredentialConfig::new().with(CredentialKey::ValidUsername, "standard_user"),
    );
    let login = LoginPage::new(&store, &credentials, BASE).unwrap();
    login.navigate().await.unwrap();

    let err = login.login_as(UserCategory::Valid).await.unwrap_err();
    assert!(matches!(
        err,
        SwagError::MissingConfiguration { ref key } if key == "VALID_USER_PASSWORD"
    ));
    assert!(!store.was_called("fill"));
}

#[tokio::test]
async fn test_login_suite_verdicts() {
    let config = SuiteConfig::new().with_credentials(SimulatedStorefront::credential_config());
    let sessions = SimulatedSessions::new(BASE).with_glitch_delay(Duration::from_millis(3_200));

    let report = Harness::new()
        .run(&sessions, &config, login_suite())
        .await
        .unwrap();

    assert_eq!(report.total(), 10);
    assert!(report.all_passed(), "failures: {:?}", report.failures());
    assert_eq!(report.expected_failure_count(), 2);

    let glitch = report
        .results
        .iter()
        .find(|r| r.name == "performance-glitch-expected")
        .unwrap();
    assert_eq!(glitch.outcome(), Outcome::Passed);
}

#[tokio::test]
async fn test_fast_glitch_user_fails_lower_bound() {
    let config = SuiteConfig::new().with_credentials(SimulatedStorefront::credential_config());
    let sessions = SimulatedSessions::new(BASE).with_glitch_delay(Duration::ZERO);

    let report = Harness::new()
        .with_filter("performance-glitch")
        .run(&sessions, &config, login_suite())
        .await
        .unwrap();

    let outcomes: Vec<_> = report.results.iter().map(|r| r.outcome()).collect();
    assert_eq!(outcomes, vec![Outcome::Failed, Outcome::UnexpectedPass]);
}
