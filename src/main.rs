//! netalert - network anomaly alert monitor
//!
//! A command-line tool that shows the anomaly count reported by the
//! prediction API and follows the live alert stream.

use clap::Parser;
use netalert::cli::args::{generate_completions, Cli, Commands};
use netalert::commands::{run_fetch, run_watch};
use netalert::config::{Config, ConfigBuilder};
use netalert::error::AppError;
use netalert::logging;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        generate_completions(*shell);
        return;
    }

    // The config file may also request verbose logging
    let config = ConfigBuilder::new()
        .with_file(cli.config.as_deref())
        .and_then(|builder| {
            builder
                .with_verbose(cli.verbose.then_some(true))
                .with_api_url(cli.api_url.clone())
                .with_stream_url(cli.stream_url.clone())
                .with_timeout(cli.timeout)
                .build()
        });

    let verbose = match &config {
        Ok(config) => config.general.verbose,
        Err(_) => cli.verbose,
    };
    logging::init(verbose);

    let result = config.map_err(AppError::from).and_then(|config| {
        if let Some(path) = &config.source {
            log::info!("Loaded config from {}", path.display());
        }
        run(&cli, &config)
    });

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        match &cli.command {
            Commands::Watch => run_watch(config, cli.format).await,
            Commands::Fetch => run_fetch(config, cli.format).await,
            Commands::Completions { .. } => Ok(()),
        }
    });

    // A blocked stdin read must not hold up exit
    runtime.shutdown_background();
    result
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Fetch(netalert::error::FetchError::Transport { .. }) => {
            eprintln!();
            eprintln!("Hint: Is the prediction API running?");
            eprintln!("      Set its address with --api-url or NETALERT_API_URL.");
        }
        AppError::Config(netalert::error::ConfigError::FileNotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Check the --config path or NETALERT_CONFIG.");
        }
        _ => {}
    }
}
