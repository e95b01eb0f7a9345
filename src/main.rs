//! Netro - Networking Troubleshooting Toolkit
//!
//! This is the main entry point for the Netro application.

use anyhow::Result;
use clap::{Parser, Subcommand};
use netro::config::{load_config, Config};
use netro::nc::{connect, listen, ListenOptions, NcArgs, NcRequest, Stdio};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Netro - A versatile networking and troubleshooting CLI tool
#[derive(Parser, Debug)]
#[command(name = "netro")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to an optional configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Enable JSON logging format
    #[arg(long, global = true)]
    json_log: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Netcat (nc) for TCP and UDP connections; -l listens for incoming ones
    Nc(NcArgs),
    /// Print the version number of Netro
    Version,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Setup logging
    if let Err(e) = setup_logging(&args.log_level, args.json_log) {
        eprintln!("Failed to set up logging: {:#}", e);
        process::exit(1);
    }

    match args.command {
        Some(Command::Nc(nc)) => run_nc(nc, args.config).await,
        Some(Command::Version) => println!("{}", netro::version_string()),
        None => println!("Welcome to Netro! Use 'netro --help' to see available commands."),
    }
}

async fn run_nc(nc: NcArgs, config_path: Option<PathBuf>) {
    let context = if nc.listen {
        "Error executing nc listen"
    } else {
        "Error executing nc"
    };

    let config = match config_path {
        Some(path) => match load_config(&path) {
            Ok(config) => config,
            Err(e) => fail(context, format!("{:#}", e)),
        },
        None => Config::default(),
    };

    let request = match nc.to_request(&config.nc) {
        Ok(request) => request,
        Err(e) if e.is_config() => {
            eprintln!("{}: {}", context, e);
            eprintln!("Run 'netro nc --help' for usage.");
            process::exit(1);
        }
        Err(e) => fail(context, e),
    };

    match request {
        NcRequest::Connect(request) => match connect(&request).await {
            Ok(connected) => println!("{}", connected),
            Err(e) => fail(context, e),
        },
        NcRequest::Listen(request) => {
            let options = ListenOptions::from(&config.nc);
            match listen(&request, &options, Arc::new(Stdio)).await {
                Err(e) => fail(context, e),
                Ok(never) => match never {},
            }
        }
    }
}

/// Report an error on standard error and exit non-zero
fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", context, err);
    process::exit(1);
}

/// Setup logging based on configuration
///
/// Logs go to standard error; standard output carries relayed data.
fn setup_logging(level: &str, json: bool) -> Result<()> {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    if json {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}
