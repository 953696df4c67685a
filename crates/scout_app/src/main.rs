mod app;
mod commands;
mod config;
mod effects;
mod render;
mod signals;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use scout_logging::{scout_error, LogDestination, DEFAULT_LOG_FILE};

use config::{load_config, to_ron, DEFAULT_CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(about = "Explore GitHub contributors and get project recommendations", long_about = None)]
struct Args {
    /// Config file (RON)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Backend base url, overrides the config file
    #[arg(long, value_name = "URL")]
    api: Option<String>,

    /// Where logs go: file, terminal or both
    #[arg(long, value_name = "DEST", default_value = "file", value_parser = parse_destination)]
    log: LogDestination,

    /// Log debug output
    #[arg(long)]
    verbose: bool,

    /// Print the effective config and exit
    #[arg(long)]
    print_config: bool,
}

fn parse_destination(value: &str) -> Result<LogDestination, String> {
    LogDestination::parse(value).ok_or_else(|| format!("unknown log destination {value:?}"))
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    scout_logging::initialize(args.log, level, &PathBuf::from(DEFAULT_LOG_FILE));

    let mut config = load_config(&args.config);
    if let Some(api) = args.api {
        config.api_base_url = api;
    }

    if args.print_config {
        return match to_ron(&config) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("Failed to format config: {err}");
                ExitCode::FAILURE
            }
        };
    }

    match app::run_app(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            scout_error!("Scout failed to start: {}", err);
            eprintln!("scout: {err}");
            ExitCode::FAILURE
        }
    }
}
