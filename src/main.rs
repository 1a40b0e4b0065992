//! gesture-driver - remote input-gesture driver
//!
//! Entry point for the driver binary: reads gesture commands line by
//! line on stdin and replays them on a connected device.

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gesture_driver::config::{Config, ScreenDimensions, SwipePadding};
use gesture_driver::device::adb::DEFAULT_DEVICE_ROOT;
use gesture_driver::device::AdbTarget;
use gesture_driver::session::SessionController;

/// Command-line arguments for gesture-driver
#[derive(Parser, Debug)]
#[command(name = "gesture-driver")]
#[command(version, about = "Remote input-gesture driver", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Device dimensions as a bracketed list, e.g. "[320,480]"
    #[arg(long, env = "GESTURE_DEVICE_DIMENSIONS")]
    pub device_dimensions: Option<ScreenDimensions>,

    /// Swipe padding as a bracketed list, e.g. "[40,40,40,40]"
    #[arg(long, env = "GESTURE_SWIPE_PADDING")]
    pub swipe_padding: Option<SwipePadding>,

    /// Input device node the injector writes events to
    #[arg(long)]
    pub input_device: Option<String>,

    /// Path of the injector executable on the device
    #[arg(long)]
    pub injector_path: Option<String>,

    /// adb executable used to reach the device
    #[arg(long, default_value = "adb")]
    pub adb_path: String,

    /// Device serial passed to adb -s
    #[arg(short, long, env = "ANDROID_SERIAL")]
    pub serial: Option<String>,

    /// Writable directory on the device for transient scripts
    #[arg(long, default_value = DEFAULT_DEVICE_ROOT)]
    pub device_root: String,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long, default_value = "compact")]
    pub log_format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args)?;

    info!("gesture-driver v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let config = config.with_overrides(
        args.device_dimensions,
        args.swipe_padding,
        args.input_device.clone(),
        args.injector_path.clone(),
    );
    config.validate()?;
    tracing::debug!(?config, "configuration loaded");

    let target = AdbTarget::new(
        args.adb_path.clone(),
        args.serial.clone(),
        args.device_root.clone(),
    );
    let controller = SessionController::new(config, Box::new(target));

    run_loop(&controller).await
}

/// Read command lines from stdin until end of input, an empty line, or
/// an interrupt, executing each fully before reading the next.
async fn run_loop(controller: &SessionController) -> Result<()> {
    // The controlling process waits for this marker before sending any
    // commands.
    {
        let mut stdout = std::io::stdout();
        writeln!(stdout, "READY")?;
        stdout.flush()?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        // An interrupt aborts the wait for the next command, never a
        // command already in flight.
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, shutting down");
                break;
            }
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            // end of input
            break;
        };
        if line.is_empty() {
            info!("empty line, shutting down");
            break;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((command, command_args)) = tokens.split_first() else {
            error!(line = %line, "no command on input line");
            continue;
        };

        // Per-command errors are reported and the session continues.
        if let Err(err) = controller.execute(command, command_args).await {
            error!(command = %command, error = %err, "command failed");
        }
    }

    Ok(())
}

fn init_logging(args: &Args) -> Result<()> {
    let log_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("gesture_driver={log_level},warn")));

    // stdout carries the line protocol; all logging goes to stderr.
    match args.log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }

    Ok(())
}
