//! swag-e2e: command-line runner for the Swag Labs page-object scenarios.
//!
//! ```bash
//! swag-e2e list                            # Show the scenario catalog
//! swag-e2e run --simulate                  # Run everything in memory
//! swag-e2e run --suite login --fail-fast   # Run one suite in chromium
//! swag-e2e config --config suite.yaml      # Print the effective config
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]

mod commands;
mod config;
mod error;
mod logging;
mod output;
mod runner;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, FormatArg, ListArgs, LogFormatArg, RunArgs, SelectArgs,
    SourceArgs, SuiteArg,
};
pub use config::{CliConfig, ColorChoice, LogFormat, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::{default_filter, init_tracing};
pub use output::{render_catalog, render_report_text, OutputFormat, ProgressReporter};
pub use runner::{build_harness, list_scenarios, load_suite_config, render_config, SuiteRunner};
