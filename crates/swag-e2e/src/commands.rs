//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// swag-e2e: run the Swag Labs page-object scenarios
#[derive(Parser, Debug)]
#[command(name = "swag-e2e")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Log line format
    #[arg(long, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios against a browser or the simulator
    Run(RunArgs),

    /// List the scenario catalog
    List(ListArgs),

    /// Show the effective suite configuration
    Config(ConfigArgs),
}

/// Scenario selection shared by `run` and `list`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SelectArgs {
    /// Only this suite (repeatable)
    #[arg(short, long)]
    pub suite: Vec<SuiteArg>,

    /// Filter scenarios by name or title substring
    #[arg(short, long)]
    pub filter: Option<String>,
}

/// Configuration sources shared by `run` and `config`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// YAML configuration file
    #[arg(short, long, env = "SWAG_E2E_CONFIG")]
    pub config: Option<PathBuf>,

    /// Storefront URL (overrides file and BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Element wait in milliseconds
    #[arg(long)]
    pub element_timeout: Option<u64>,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Scenario selection
    #[command(flatten)]
    pub select: SelectArgs,

    /// Configuration sources
    #[command(flatten)]
    pub source: SourceArgs,

    /// Run against the in-memory storefront instead of a browser
    #[arg(long)]
    pub simulate: bool,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Disable the chromium sandbox
    #[arg(long)]
    pub no_sandbox: bool,

    /// Chromium binary
    #[arg(long)]
    pub chromium: Option<String>,

    /// Stop after the first failing scenario
    #[arg(long)]
    pub fail_fast: bool,

    /// Per-scenario timeout in milliseconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Result format on stdout
    #[arg(long, default_value = "text")]
    pub format: FormatArg,

    /// Also write the JSON report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Scenario selection
    #[command(flatten)]
    pub select: SelectArgs,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Configuration sources
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print passwords instead of masking them
    #[arg(long)]
    pub show_secrets: bool,
}

/// Suite selector
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuiteArg {
    /// Login feature
    Login,
    /// Dashboard functionality
    Dashboard,
}

impl From<SuiteArg> for swag_pom::Suite {
    fn from(arg: SuiteArg) -> Self {
        match arg {
            SuiteArg::Login => Self::Login,
            SuiteArg::Dashboard => Self::Dashboard,
        }
    }
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON document
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Log format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormatArg {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl From<LogFormatArg> for crate::config::LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_run_command() {
            let cli = Cli::try_parse_from(["swag-e2e", "run", "--simulate"]).unwrap();
            match cli.command {
                Commands::Run(args) => {
                    assert!(args.simulate);
                    assert!(!args.fail_fast);
                    assert!(args.select.suite.is_empty());
                    assert_eq!(args.format, FormatArg::Text);
                }
                _ => panic!("expected run command"),
            }
        }

        #[test]
        fn test_parse_run_selection() {
            let cli = Cli::try_parse_from([
                "swag-e2e",
                "run",
                "--suite",
                "login",
                "--suite",
                "dashboard",
                "--filter",
                "sort",
                "--fail-fast",
                "--timeout",
                "5000",
                "--format",
                "json",
            ])
            .unwrap();
            match cli.command {
                Commands::Run(args) => {
                    assert_eq!(args.select.suite, vec![SuiteArg::Login, SuiteArg::Dashboard]);
                    assert_eq!(args.select.filter.as_deref(), Some("sort"));
                    assert!(args.fail_fast);
                    assert_eq!(args.timeout, Some(5000));
                    assert_eq!(args.format, FormatArg::Json);
                }
                _ => panic!("expected run command"),
            }
        }

        #[test]
        fn test_parse_global_flags() {
            let cli = Cli::try_parse_from([
                "swag-e2e",
                "-vv",
                "--color",
                "never",
                "--log-format",
                "json",
                "list",
            ])
            .unwrap();
            assert_eq!(cli.verbose, 2);
            assert!(matches!(cli.color, ColorArg::Never));
            assert!(matches!(cli.log_format, LogFormatArg::Json));
            assert!(matches!(cli.command, Commands::List(_)));
        }

        #[test]
        fn test_unknown_suite_rejected() {
            assert!(Cli::try_parse_from(["swag-e2e", "list", "--suite", "checkout"]).is_err());
        }

        #[test]
        fn test_subcommand_required() {
            assert!(Cli::try_parse_from(["swag-e2e"]).is_err());
        }
    }
}
