//! Scenario runner and command implementations

use crate::commands::{ConfigArgs, FormatArg, ListArgs, RunArgs, SelectArgs, SourceArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{render_catalog, render_report_text, OutputFormat, ProgressReporter};
use std::path::Path;
use std::time::Duration;
use swag_pom::{
    catalog, CredentialKey, Harness, Scenario, SessionFactory, SimulatedSessions,
    SimulatedStorefront, SuiteConfig, SuiteReport,
};

const MASK: &str = "********";

/// Load the suite configuration and apply command-line overrides
pub fn load_suite_config(source: &SourceArgs) -> CliResult<SuiteConfig> {
    let mut config = SuiteConfig::load(source.config.as_deref())?;
    if let Some(ref url) = source.base_url {
        config = config.with_base_url(url.clone());
    }
    if let Some(ms) = source.element_timeout {
        config = config.with_element_timeout(ms);
    }
    tracing::debug!(
        base_url = %config.base_url,
        element_timeout_ms = config.element_timeout_ms,
        file = ?source.config,
        "suite config ready"
    );
    Ok(config)
}

/// Build a harness from the selection flags
#[must_use]
pub fn build_harness(select: &SelectArgs) -> Harness {
    let mut harness = Harness::new();
    for suite in &select.suite {
        harness = harness.with_suite((*suite).into());
    }
    if let Some(ref filter) = select.filter {
        harness = harness.with_filter(filter.clone());
    }
    harness
}

/// Render the selected catalog entries
pub fn list_scenarios(args: &ListArgs) -> CliResult<String> {
    let scenarios = build_harness(&args.select).select(catalog());
    tracing::debug!(count = scenarios.len(), "listing scenarios");
    match args.format {
        FormatArg::Text => Ok(render_catalog(&scenarios)),
        FormatArg::Json => serde_json::to_string_pretty(&scenarios)
            .map(|json| json + "\n")
            .map_err(|e| CliError::report_generation(e.to_string())),
    }
}

/// Render the effective configuration as YAML
pub fn render_config(args: &ConfigArgs) -> CliResult<(String, Vec<CredentialKey>)> {
    let mut config = load_suite_config(&args.source)?;
    let missing = config.credentials.missing_keys();
    if !args.show_secrets {
        for key in [CredentialKey::ValidPassword, CredentialKey::InvalidPassword] {
            if config.credentials.get(key).is_some() {
                config.credentials.set(key, MASK);
            }
        }
    }
    let yaml = serde_yaml_ng::to_string(&config).map_err(|e| CliError::config(e.to_string()))?;
    Ok((yaml, missing))
}

/// Runs scenario suites and reports their results
#[derive(Debug)]
pub struct SuiteRunner {
    config: CliConfig,
    reporter: ProgressReporter,
}

impl SuiteRunner {
    /// Create a runner
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        let reporter =
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self { config, reporter }
    }

    /// Get the CLI configuration
    #[must_use]
    pub const fn config(&self) -> &CliConfig {
        &self.config
    }

    /// Execute the `run` command, returning the report
    pub fn run(&mut self, args: &RunArgs) -> CliResult<SuiteReport> {
        let mut suite_config = load_suite_config(&args.source)?
            .with_headless(!args.headed)
            .with_sandbox(!args.no_sandbox);
        if let Some(ref path) = args.chromium {
            suite_config = suite_config.with_chromium_path(path.clone());
        }
        if args.simulate {
            let mut credentials = SimulatedStorefront::credential_config();
            credentials.merge(&suite_config.credentials);
            suite_config = suite_config.with_credentials(credentials);
        }

        let mut harness = build_harness(&args.select);
        if args.fail_fast {
            harness = harness.with_fail_fast();
        }
        if let Some(ms) = args.timeout {
            harness = harness.with_timeout(Duration::from_millis(ms));
        }

        let scenarios = harness.select(catalog());
        if scenarios.is_empty() {
            tracing::warn!(filter = ?args.select.filter, "selection is empty");
            return Err(CliError::invalid_argument(
                "no scenarios match the given suite and filter",
            ));
        }

        tracing::info!(
            scenarios = scenarios.len(),
            simulate = args.simulate,
            base_url = %suite_config.base_url,
            "starting run"
        );
        if self.config.verbosity.is_verbose() {
            self.reporter.info(&format!(
                "Running {} scenario(s) against {}",
                scenarios.len(),
                suite_config.base_url
            ));
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        let report = if args.simulate {
            let sessions = SimulatedSessions::new(suite_config.base_url.clone());
            self.execute(&runtime, &harness, &sessions, &suite_config, scenarios)?
        } else {
            self.run_browser(&runtime, &harness, &suite_config, scenarios)?
        };

        self.emit(&report, args.format.into())?;
        if let Some(ref path) = args.output {
            write_report(&report, path)?;
            tracing::info!(path = %path.display(), "report written");
            if !self.config.verbosity.is_quiet() {
                self.reporter
                    .info(&format!("Report written to {}", path.display()));
            }
        }

        tracing::info!(
            passed = report.passed_count(),
            failed = report.failed_count(),
            duration_ms = u64::try_from(report.duration.as_millis()).unwrap_or(u64::MAX),
            "run finished"
        );
        if report.all_passed() {
            Ok(report)
        } else {
            Err(CliError::scenario_failure(format!(
                "{} of {} scenario(s) did not meet expectations",
                report.failed_count(),
                report.total()
            )))
        }
    }

    #[cfg(feature = "browser")]
    fn run_browser(
        &mut self,
        runtime: &tokio::runtime::Runtime,
        harness: &Harness,
        suite_config: &SuiteConfig,
        scenarios: Vec<Scenario>,
    ) -> CliResult<SuiteReport> {
        let sessions = swag_pom::ChromiumSessions::new(suite_config.clone());
        self.execute(runtime, harness, &sessions, suite_config, scenarios)
    }

    #[cfg(not(feature = "browser"))]
    #[allow(clippy::unused_self)]
    fn run_browser(
        &mut self,
        _runtime: &tokio::runtime::Runtime,
        _harness: &Harness,
        _suite_config: &SuiteConfig,
        _scenarios: Vec<Scenario>,
    ) -> CliResult<SuiteReport> {
        tracing::error!("browser run requested but the browser feature is disabled");
        Err(CliError::invalid_argument(
            "browser support not enabled; pass --simulate or rebuild with --features browser",
        ))
    }

    fn execute<F: SessionFactory>(
        &mut self,
        runtime: &tokio::runtime::Runtime,
        harness: &Harness,
        sessions: &F,
        suite_config: &SuiteConfig,
        scenarios: Vec<Scenario>,
    ) -> CliResult<SuiteReport> {
        self.reporter.header("Swag Labs scenarios");
        self.reporter
            .start_progress(scenarios.len() as u64, "Running scenarios");

        let reporter = &self.reporter;
        let report = runtime.block_on(harness.run_with(
            sessions,
            suite_config,
            scenarios,
            |result| reporter.scenario(result),
        ));
        self.reporter.finish();

        let report = report?;
        self.reporter.summary(&report);
        Ok(report)
    }

    #[allow(clippy::unused_self)]
    fn emit(&self, report: &SuiteReport, format: OutputFormat) -> CliResult<()> {
        match format {
            OutputFormat::Text => print!("{}", render_report_text(report)),
            OutputFormat::Json => println!("{}", report.to_json()?),
        }
        Ok(())
    }
}

fn write_report(report: &SuiteReport, path: &Path) -> CliResult<()> {
    let json = report.to_json()?;
    std::fs::write(path, json).map_err(|e| {
        CliError::report_generation(format!("cannot write {}: {e}", path.display()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::commands::SuiteArg;
    use std::path::PathBuf;

    fn write_yaml(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("suite.yaml");
        std::fs::write(&path, body).unwrap();
        path
    }

    mod harness_tests {
        use super::*;

        #[test]
        fn test_build_harness_from_selection() {
            let select = SelectArgs {
                suite: vec![SuiteArg::Dashboard, SuiteArg::Dashboard],
                filter: Some("sort".to_string()),
            };
            let harness = build_harness(&select);
            assert_eq!(harness.suites, vec![swag_pom::Suite::Dashboard]);
            let names: Vec<_> = harness.select(catalog()).iter().map(|s| s.name).collect();
            assert_eq!(names, vec!["sort-az", "sort-za", "sort-lohi", "sort-hilo"]);
        }

        #[test]
        fn test_empty_selection_keeps_catalog() {
            let harness = build_harness(&SelectArgs::default());
            assert_eq!(harness.select(catalog()).len(), catalog().len());
        }
    }

    mod list_tests {
        use super::*;

        #[test]
        fn test_list_text() {
            let args = ListArgs {
                select: SelectArgs {
                    suite: vec![SuiteArg::Login],
                    filter: None,
                },
                format: FormatArg::Text,
            };
            let text = list_scenarios(&args).unwrap();
            assert!(text.contains("locked-out-user"));
            assert!(!text.contains("sort-az"));
            assert!(text.ends_with("10 scenario(s)\n"));
        }

        #[test]
        fn test_list_json() {
            let args = ListArgs {
                select: SelectArgs {
                    suite: Vec::new(),
                    filter: Some("menu".to_string()),
                },
                format: FormatArg::Json,
            };
            let json = list_scenarios(&args).unwrap();
            let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
            let entries = parsed.as_array().unwrap();
            assert!(!entries.is_empty());
            assert!(entries
                .iter()
                .all(|e| e["suite"] == serde_json::json!("dashboard")));
        }
    }

    mod logging_tests {
        use super::*;
        use std::io;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        #[test]
        fn test_listing_emits_events() {
            let captured = Captured::default();
            let writer = captured.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_writer(move || writer.clone())
                .with_max_level(tracing::Level::DEBUG)
                .with_ansi(false)
                .finish();

            let args = ListArgs {
                select: SelectArgs {
                    suite: vec![SuiteArg::Dashboard],
                    filter: None,
                },
                format: FormatArg::Text,
            };
            tracing::subscriber::with_default(subscriber, || list_scenarios(&args).unwrap());

            let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
            assert!(logs.contains("listing scenarios"));
            assert!(logs.contains("count=12"));
            assert!(logs.contains("swag_e2e::runner"));
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_overrides_win_over_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = write_yaml(&dir, "base_url: http://from-file\nelement_timeout_ms: 1000\n");
            let source = SourceArgs {
                config: Some(path),
                base_url: Some("http://from-flag".to_string()),
                element_timeout: Some(2500),
            };
            let config = load_suite_config(&source).unwrap();
            assert_eq!(config.base_url, "http://from-flag");
            assert_eq!(config.element_timeout_ms, 2500);
        }

        #[test]
        fn test_passwords_masked() {
            let dir = tempfile::tempdir().unwrap();
            let path = write_yaml(
                &dir,
                "credentials:\n  valid_user_username: standard_user\n  valid_user_password: hunter2\n",
            );
            let args = ConfigArgs {
                source: SourceArgs {
                    config: Some(path.clone()),
                    ..SourceArgs::default()
                },
                show_secrets: false,
            };
            let (yaml, _) = render_config(&args).unwrap();
            assert!(yaml.contains("standard_user"));
            assert!(yaml.contains(MASK));
            assert!(!yaml.contains("hunter2"));

            let args = ConfigArgs {
                source: SourceArgs {
                    config: Some(path),
                    ..SourceArgs::default()
                },
                show_secrets: true,
            };
            let (yaml, _) = render_config(&args).unwrap();
            assert!(yaml.contains("hunter2"));
        }

        #[test]
        fn test_bad_file_rejected() {
            let dir = tempfile::tempdir().unwrap();
            let path = write_yaml(&dir, "element_timeout_ms: [not, a, number]\n");
            let source = SourceArgs {
                config: Some(path),
                ..SourceArgs::default()
            };
            assert!(load_suite_config(&source).is_err());
        }
    }
}
