//! swag-e2e binary

use clap::Parser;
use std::process::ExitCode;
use swag_e2e::{
    init_tracing, list_scenarios, render_config, Cli, CliConfig, CliResult, Commands, ConfigArgs,
    ProgressReporter, SuiteRunner, Verbosity,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    // .env fills values the shell left unset
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = build_config(&cli);
    init_tracing(&config)?;

    match cli.command {
        Commands::Run(args) => SuiteRunner::new(config).run(&args).map(|_| ()),
        Commands::List(args) => {
            print!("{}", list_scenarios(&args)?);
            Ok(())
        }
        Commands::Config(args) => run_config(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.verbose, cli.quiet))
        .with_color(cli.color.clone().into())
        .with_log_format(cli.log_format.into())
}

fn run_config(config: &CliConfig, args: &ConfigArgs) -> CliResult<()> {
    let (yaml, missing) = render_config(args)?;
    print!("{yaml}");

    let reporter = ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    for key in missing {
        reporter.warning(&format!("{} is not set", key.env_name()));
    }
    Ok(())
}
