use cdc_check::config::{Config, ConfigLoader, LogFormat};
use cdc_check::{discover, AppError, SystemPorts, Variant};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "cdc-check",
    version,
    about = "Loopback smoke test for CDC-ACM and USB-serial devices.",
    long_about = "Writes a fixed payload to every /dev/ttyACM* and /dev/ttyUSB* device at 115200 baud and reads back the response. In verify mode the response must be an exact echo."
)]
struct Args {
    /// Run variant: probe prints responses, verify requires an exact echo.
    #[arg(long, value_enum)]
    variant: Option<Variant>,

    /// Configuration file to use instead of the default locations.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only list discovered devices; open nothing.
    #[arg(short, long)]
    list: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match ConfigLoader::load(args.config.as_deref()) {
        Ok(loader) => loader.into_config(),
        Err(e) => {
            eprintln!("cdc-check: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(variant) = args.variant {
        config.check.variant = variant;
    }

    init_tracing(&config, args.verbose);

    match execute(&config, args.list) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(device = e.device().unwrap_or("-"), error = ?e, "run failed");
            eprintln!("cdc-check: {e}");
            ExitCode::FAILURE
        }
    }
}

fn execute(config: &Config, list_only: bool) -> Result<(), AppError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if list_only {
        for device in discover(&config.discovery.patterns)? {
            writeln!(out, "{device}").map_err(AppError::Output)?;
        }
        return Ok(());
    }

    let outcomes = cdc_check::run(config, SystemPorts, &mut out)?;
    out.flush().map_err(AppError::Output)?;
    info!(
        variant = %config.check.variant,
        devices = outcomes.len(),
        echoed = outcomes.iter().filter(|o| o.echoed).count(),
        "run complete"
    );
    Ok(())
}

/// `RUST_LOG` wins; otherwise the configured level, raised by `-v`.
fn init_tracing(config: &Config, verbose: u8) {
    let configured = config
        .logging
        .level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::WARN);
    let requested = match verbose {
        0 => LevelFilter::OFF,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let level = configured.max(requested);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match config.logging.format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}
