//! Briar TUI entry point.
//!
//! # Usage
//!
//! ```bash
//! # Default simulation timings
//! briar-tui
//!
//! # No automatic replies or ambient typing, with a debug log
//! briar-tui --quiet --log-file briar.log --log-level debug
//! ```

use std::{fs::File, sync::Mutex, time::Duration};

use briar_core::SimulationConfig;
use briar_tui::{Runtime, SystemEnv, TerminalDriver};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Briar terminal chat prototype
#[derive(Parser, Debug)]
#[command(name = "briar-tui")]
#[command(about = "Terminal UI for the Briar secure chat prototype")]
#[command(version)]
struct Args {
    /// Disable simulated replies and ambient typing
    #[arg(long)]
    quiet: bool,

    /// Probability that the contact replies to a sent message
    #[arg(long)]
    reply_probability: Option<f64>,

    /// Probability that an ambient typing burst starts on each interval
    #[arg(long)]
    ambient_typing_probability: Option<f64>,

    /// Seconds until a sent message is delivered
    #[arg(long)]
    delivered_after: Option<u64>,

    /// Seconds until a sent message is read
    #[arg(long)]
    read_after: Option<u64>,

    /// Seconds a revealed one-time image stays visible
    #[arg(long)]
    one_time_view_grace: Option<u64>,

    /// Seconds between ambient typing checks
    #[arg(long)]
    ambient_typing_interval: Option<u64>,

    /// Log file path. Logging is off without one, the terminal belongs to
    /// the UI.
    #[arg(long)]
    log_file: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
        let layer = fmt::layer().with_writer(Mutex::new(File::create(path)?)).with_ansi(false);
        tracing_subscriber::registry().with(layer).with(filter).init();
    }

    let mut config = if args.quiet { SimulationConfig::quiet() } else { SimulationConfig::default() };
    if let Some(p) = args.reply_probability {
        config.reply_probability = p;
    }
    if let Some(p) = args.ambient_typing_probability {
        config.ambient_typing_probability = p;
    }
    if let Some(secs) = args.delivered_after {
        config.delivered_after = Duration::from_secs(secs);
    }
    if let Some(secs) = args.read_after {
        config.read_after = Duration::from_secs(secs);
    }
    if let Some(secs) = args.one_time_view_grace {
        config.one_time_view_grace = Duration::from_secs(secs);
    }
    if let Some(secs) = args.ambient_typing_interval {
        config.ambient_typing_interval = Duration::from_secs(secs);
    }
    config.validate()?;

    tracing::info!(?config, "Briar TUI starting");

    let driver = TerminalDriver::new()?;
    let mut runtime = Runtime::new(driver, SystemEnv::new(), config);
    runtime.run().await?;

    tracing::info!("Briar TUI stopped");
    Ok(())
}
