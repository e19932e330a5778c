//! Scenario harness: sessions, results and suite reports.

use crate::config::SuiteConfig;
use crate::credentials::CredentialResolver;
use crate::driver::BrowserDriver;
use crate::inventory_page::inventory_selectors;
use crate::login_page::login_selectors;
use crate::result::{SwagError, SwagResult};
use crate::scenario::{Scenario, Severity, Suite};
use crate::simulator::{SimulatedStorefront, DEFAULT_GLITCH_DELAY_MS};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Build every screen's selector registry, failing on the first gap
pub fn validate_registries() -> SwagResult<()> {
    let login = login_selectors()?;
    let inventory = inventory_selectors()?;
    tracing::debug!(
        login = login.len(),
        inventory = inventory.len(),
        "selector registries ready"
    );
    Ok(())
}

/// Resolve every account the scenarios log in with.
///
/// Runs before the first session opens so a missing credential stops the
/// whole run without touching the storefront.
pub fn check_credentials(resolver: &CredentialResolver, scenarios: &[Scenario]) -> SwagResult<()> {
    let mut checked = Vec::new();
    for category in scenarios.iter().flat_map(Scenario::categories) {
        if !checked.contains(&category) {
            resolver.resolve(category)?;
            checked.push(category);
        }
    }
    Ok(())
}

/// Opens and closes one isolated driver session per scenario
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Driver type handed to scenarios
    type Driver: BrowserDriver;

    /// Open a fresh session
    async fn open(&self) -> SwagResult<Self::Driver>;

    /// Tear a session down
    async fn close(&self, driver: Self::Driver) -> SwagResult<()>;
}

/// Sessions backed by [`SimulatedStorefront`]
#[derive(Debug, Clone)]
pub struct SimulatedSessions {
    base_url: String,
    glitch_delay: Duration,
}

impl SimulatedSessions {
    /// Sessions serving `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            glitch_delay: Duration::from_millis(DEFAULT_GLITCH_DELAY_MS),
        }
    }

    /// Set the performance-glitch login delay
    #[must_use]
    pub const fn with_glitch_delay(mut self, delay: Duration) -> Self {
        self.glitch_delay = delay;
        self
    }
}

#[async_trait]
impl SessionFactory for SimulatedSessions {
    type Driver = SimulatedStorefront;

    async fn open(&self) -> SwagResult<SimulatedStorefront> {
        Ok(SimulatedStorefront::new()
            .with_base_url(self.base_url.clone())
            .with_glitch_delay(self.glitch_delay))
    }

    async fn close(&self, _driver: SimulatedStorefront) -> SwagResult<()> {
        Ok(())
    }
}

/// Sessions backed by a real Chromium, one process per scenario
#[cfg(feature = "browser")]
#[derive(Debug, Clone)]
pub struct ChromiumSessions {
    config: SuiteConfig,
}

#[cfg(feature = "browser")]
impl ChromiumSessions {
    /// Sessions launched with `config`
    #[must_use]
    pub const fn new(config: SuiteConfig) -> Self {
        Self { config }
    }
}

#[cfg(feature = "browser")]
#[async_trait]
impl SessionFactory for ChromiumSessions {
    type Driver = crate::chromium::ChromiumDriver;

    async fn open(&self) -> SwagResult<Self::Driver> {
        crate::chromium::ChromiumDriver::launch(&self.config).await
    }

    async fn close(&self, driver: Self::Driver) -> SwagResult<()> {
        driver.close().await
    }
}

/// Verdict of one scenario against its expectation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Ran clean as expected
    Passed,
    /// Failed unexpectedly
    Failed,
    /// Failed, and failure was expected
    ExpectedFailure,
    /// Ran clean although failure was expected
    UnexpectedPass,
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Scenario name
    pub name: String,
    /// Owning suite
    pub suite: Suite,
    /// Severity annotation
    pub severity: Severity,
    /// Whether the verdict matched the expectation
    pub passed: bool,
    /// Whether failure was expected
    pub expect_failure: bool,
    /// Error raised by the run, if any
    pub error: Option<String>,
    /// The session never opened, so the scenario did not run
    pub session_failed: bool,
    /// Wall-clock time including session setup
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u128(duration.as_millis())
}

impl ScenarioResult {
    /// Judge a run of `scenario`
    #[must_use]
    pub fn from_run(scenario: &Scenario, run: &SwagResult<()>) -> Self {
        let error = run.as_ref().err().map(ToString::to_string);
        Self {
            name: scenario.name.to_string(),
            suite: scenario.suite,
            severity: scenario.severity,
            passed: error.is_some() == scenario.expect_failure,
            expect_failure: scenario.expect_failure,
            error,
            session_failed: false,
            duration: Duration::ZERO,
        }
    }

    /// Record a scenario whose session could not be opened
    #[must_use]
    pub fn session_failure(scenario: &Scenario, error: &SwagError) -> Self {
        Self {
            name: scenario.name.to_string(),
            suite: scenario.suite,
            severity: scenario.severity,
            passed: false,
            expect_failure: scenario.expect_failure,
            error: Some(error.to_string()),
            session_failed: true,
            duration: Duration::ZERO,
        }
    }

    /// Set duration
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Verdict against the expectation
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        if self.session_failed {
            return Outcome::Failed;
        }
        match (self.error.is_some(), self.expect_failure) {
            (false, false) => Outcome::Passed,
            (true, false) => Outcome::Failed,
            (true, true) => Outcome::ExpectedFailure,
            (false, true) => Outcome::UnexpectedPass,
        }
    }
}

/// Results of one harness run
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    /// Unique run identifier
    pub run_id: Uuid,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Storefront the run targeted
    pub base_url: String,
    /// Per-scenario results in run order
    pub results: Vec<ScenarioResult>,
    /// Total duration
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl SuiteReport {
    /// Check if every verdict matched its expectation
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Count matching verdicts
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Count mismatching verdicts
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    /// Count failures that were expected
    #[must_use]
    pub fn expected_failure_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome() == Outcome::ExpectedFailure)
            .count()
    }

    /// Get total scenario count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Get mismatching results
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }

    /// Render as pretty JSON
    pub fn to_json(&self) -> SwagResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs scenarios sequentially, one session each
#[derive(Debug, Clone, Default)]
pub struct Harness {
    /// Stop after the first mismatching verdict
    pub fail_fast: bool,
    /// Only run scenarios matching this filter
    pub filter: Option<String>,
    /// Only run these suites (empty = all)
    pub suites: Vec<Suite>,
    /// Per-scenario time limit
    pub timeout: Option<Duration>,
}

impl Harness {
    /// Create a new harness
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Filter scenarios by name or title
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Restrict to one suite; may be called repeatedly
    #[must_use]
    pub fn with_suite(mut self, suite: Suite) -> Self {
        if !self.suites.contains(&suite) {
            self.suites.push(suite);
        }
        self
    }

    /// Limit each scenario's run time
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Scenarios this harness would run, in catalog order
    #[must_use]
    pub fn select(&self, scenarios: Vec<Scenario>) -> Vec<Scenario> {
        scenarios
            .into_iter()
            .filter(|s| self.suites.is_empty() || self.suites.contains(&s.suite))
            .filter(|s| self.filter.as_deref().map_or(true, |f| s.matches(f)))
            .collect()
    }

    /// Run the selected scenarios
    pub async fn run<F: SessionFactory>(
        &self,
        factory: &F,
        config: &SuiteConfig,
        scenarios: Vec<Scenario>,
    ) -> SwagResult<SuiteReport> {
        self.run_with(factory, config, scenarios, |_| {}).await
    }

    /// Run the selected scenarios, reporting each result as it lands
    pub async fn run_with<F, R>(
        &self,
        factory: &F,
        config: &SuiteConfig,
        scenarios: Vec<Scenario>,
        mut on_result: R,
    ) -> SwagResult<SuiteReport>
    where
        F: SessionFactory,
        R: FnMut(&ScenarioResult),
    {
        validate_registries()?;

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();
        let resolver = CredentialResolver::new(config.credentials.clone());
        let selected = self.select(scenarios);
        check_credentials(&resolver, &selected)?;
        let mut results = Vec::with_capacity(selected.len());

        tracing::info!(
            %run_id,
            scenarios = selected.len(),
            base_url = %config.base_url,
            "suite run started"
        );

        for scenario in &selected {
            let scenario_start = Instant::now();
            tracing::info!(
                scenario = scenario.name,
                suite = %scenario.suite,
                severity = %scenario.severity,
                "scenario started"
            );

            let (result, setup_error) = match factory.open().await {
                Ok(driver) => {
                    let run = self
                        .run_one(scenario, &driver, &resolver, &config.base_url)
                        .await;
                    if let Err(e) = factory.close(driver).await {
                        tracing::warn!(
                            scenario = scenario.name,
                            error = %e,
                            "session close failed"
                        );
                    }
                    (ScenarioResult::from_run(scenario, &run), false)
                }
                Err(e) => {
                    tracing::error!(scenario = scenario.name, error = %e, "session open failed");
                    (
                        ScenarioResult::session_failure(scenario, &e),
                        e.is_configuration_error(),
                    )
                }
            };
            let result = result.with_duration(scenario_start.elapsed());
            tracing::info!(
                scenario = scenario.name,
                outcome = ?result.outcome(),
                elapsed_ms = u64::try_from(result.duration.as_millis()).unwrap_or(u64::MAX),
                "scenario finished"
            );
            on_result(&result);

            let stop = setup_error || (self.fail_fast && !result.passed);
            results.push(result);
            if stop {
                tracing::info!(scenario = scenario.name, "stopping run after failure");
                break;
            }
        }

        Ok(SuiteReport {
            run_id,
            started_at,
            base_url: config.base_url.clone(),
            results,
            duration: start.elapsed(),
        })
    }

    async fn run_one<D: BrowserDriver>(
        &self,
        scenario: &Scenario,
        driver: &D,
        resolver: &CredentialResolver,
        base_url: &str,
    ) -> SwagResult<()> {
        let run = scenario.run(driver, resolver, base_url);
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run).await.map_err(|_| {
                SwagError::assertion(format!(
                    "scenario {} exceeded {}ms",
                    scenario.name,
                    limit.as_millis()
                ))
            })?,
            None => run.await,
        }
    }
}
