//! Output formatting and progress reporting

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use swag_pom::{Outcome, Scenario, ScenarioResult, SuiteReport};

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Progress reporter for scenario execution
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar for multiple scenarios
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet || !self.term.is_term() {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    fn line(&self, text: &str) {
        match self.progress_bar {
            Some(ref pb) => pb.println(text),
            None => {
                let _ = self.term.write_line(text);
            }
        }
    }

    fn prefixed(&self, symbol: &str, styled: Style, plain: &str, message: &str) -> String {
        let prefix = if self.use_color {
            styled.apply_to(symbol).to_string()
        } else {
            plain.to_string()
        };
        format!("{prefix} {message}")
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.line(&self.prefixed("✓", Style::new().green().bold(), "PASS", message));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        self.line(&self.prefixed("✗", Style::new().red().bold(), "FAIL", message));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.line(&self.prefixed("⚠", Style::new().yellow().bold(), "WARN", message));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.line(&self.prefixed("ℹ", Style::new().blue().bold(), "INFO", message));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        self.line("");
        self.line(&styled);
    }

    /// Report one finished scenario and advance the bar
    pub fn scenario(&self, result: &ScenarioResult) {
        let elapsed = result.duration.as_secs_f64();
        let label = format!("{} [{}] ({elapsed:.2}s)", result.name, result.severity);
        match result.outcome() {
            Outcome::Passed => self.success(&label),
            Outcome::ExpectedFailure => self.warning(&format!("{label} failed as expected")),
            Outcome::Failed => self.failure(&format!(
                "{label}: {}",
                result.error.as_deref().unwrap_or("unknown error")
            )),
            Outcome::UnexpectedPass => {
                self.failure(&format!("{label} passed but a known defect should have failed it"));
            }
        }
        if let Some(ref pb) = self.progress_bar {
            pb.inc(1);
        }
    }

    /// Print run summary
    pub fn summary(&self, report: &SuiteReport) {
        let failed = report.failed_count();
        if self.quiet && failed == 0 {
            return;
        }

        let total = report.total();
        let passed = report.passed_count();
        let xfail = report.expected_failure_count();
        let duration_secs = report.duration.as_secs_f64();

        self.line("");
        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let xfail_style = Style::new().yellow();

            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };

            self.line(&format!(
                "{status} {total} scenarios in {duration_secs:.2}s ({} passed, {} failed, {} expected failures)",
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
                xfail_style.apply_to(xfail)
            ));
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            self.line(&format!(
                "{status} {total} scenarios in {duration_secs:.2}s ({passed} passed, {failed} failed, {xfail} expected failures)"
            ));
        }
    }
}

/// Render the catalog listing
#[must_use]
pub fn render_catalog(scenarios: &[Scenario]) -> String {
    let width = scenarios.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for s in scenarios {
        let marker = if s.expect_failure { " (expected to fail)" } else { "" };
        out.push_str(&format!(
            "{:<9} {:<width$}  {:<8}  {}{marker}\n",
            s.suite.to_string(),
            s.name,
            s.severity.to_string(),
            s.title,
        ));
    }
    out.push_str(&format!("{} scenario(s)\n", scenarios.len()));
    out
}

/// Render a finished report as plain text
#[must_use]
pub fn render_report_text(report: &SuiteReport) -> String {
    let mut out = format!("run {} against {}\n", report.run_id, report.base_url);
    for r in &report.results {
        let verdict = match r.outcome() {
            Outcome::Passed => "ok",
            Outcome::Failed => "FAILED",
            Outcome::ExpectedFailure => "xfail",
            Outcome::UnexpectedPass => "XPASS",
        };
        out.push_str(&format!("{verdict:<6} {} ({}ms)\n", r.name, r.duration.as_millis()));
        if let (Outcome::Failed, Some(error)) = (r.outcome(), r.error.as_deref()) {
            out.push_str(&format!("       {error}\n"));
        }
    }
    out.push_str(&format!(
        "{} passed, {} failed, {} expected failures\n",
        report.passed_count(),
        report.failed_count(),
        report.expected_failure_count()
    ));
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::time::Duration;
    use swag_pom::{catalog, dashboard_suite, SwagError};

    mod output_format_tests {
        use super::*;

        #[test]
        fn test_default_format() {
            assert_eq!(OutputFormat::default(), OutputFormat::Text);
        }
    }

    mod progress_reporter_tests {
        use super::*;

        #[test]
        fn test_new_reporter() {
            let reporter = ProgressReporter::new(true, false);
            assert!(reporter.use_color);
            assert!(!reporter.quiet);
        }

        #[test]
        fn test_plain_prefix() {
            let reporter = ProgressReporter::new(false, false);
            let line = reporter.prefixed("✓", Style::new(), "PASS", "sort-az");
            assert_eq!(line, "PASS sort-az");
        }

        #[test]
        fn test_quiet_mode_suppresses_output() {
            let mut reporter = ProgressReporter::new(false, true);
            reporter.start_progress(10, "Running scenarios");
            assert!(reporter.progress_bar.is_none());
            reporter.success("hidden");
            reporter.failure("shown");
            reporter.finish();
        }
    }

    mod render_tests {
        use super::*;

        #[test]
        fn test_catalog_listing() {
            let text = render_catalog(&catalog());
            assert!(text.contains("valid-login"));
            assert!(text.contains("problem-user-unexpected"));
            assert!(text.contains("(expected to fail)"));
            assert!(text.ends_with("22 scenario(s)\n"));
        }

        #[test]
        fn test_report_text() {
            let suite = dashboard_suite();
            let report = SuiteReport {
                run_id: uuid::Uuid::nil(),
                started_at: chrono::Utc::now(),
                base_url: "http://localhost".to_string(),
                results: vec![
                    ScenarioResult::from_run(&suite[0], &Ok(()))
                        .with_duration(Duration::from_millis(12)),
                    ScenarioResult::from_run(&suite[1], &Err(SwagError::assertion("badge shown"))),
                ],
                duration: Duration::from_millis(20),
            };
            let text = render_report_text(&report);
            assert!(text.contains("ok     add-to-cart (12ms)"));
            assert!(text.contains("FAILED remove-from-cart"));
            assert!(text.contains("badge shown"));
            assert!(text.ends_with("1 passed, 1 failed, 0 expected failures\n"));
        }
    }
}
