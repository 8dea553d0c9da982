// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! roocart - fill a basket and check out from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Run with settings from the environment and ./items.json
//! roocart
//!
//! # Another items file, shorter rate-limit wait
//! roocart --items lunch.json --wait-secs 2
//!
//! # Give up on an item after ten unconfirmed submissions
//! roocart --max-item-attempts 10
//!
//! # Machine-readable run report
//! roocart --format json --pretty
//! ```

mod output;
mod run;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use output::{JsonFormatter, TextFormatter};

// ============================================================================
// CLI Definition
// ============================================================================

/// roocart - basket filling and checkout runner.
#[derive(Debug, Parser)]
#[command(name = "roocart")]
#[command(about = "Fill a delivery basket and check out")]
#[command(long_about = r#"
roocart clears the basket, adds every item from the items file until the
basket confirms it, creates a payment plan and executes it. Payment
challenges are forwarded to Telegram when configured.

Settings come from the environment:
  AUTHORIZATION, X_ROO_GUID, X_ROO_STICKY_GUID, RESTAURANT_ID   required
  TELEGRAM_BOT_TOKEN, TELEGRAM_CHAT_ID, TELEGRAM_MESSAGE_TEMPLATE
  USE_PROXY=True with HOST, PORT, LOGIN, PASSWORD
  ROOCART_ITEMS_FILE, ROOCART_WAIT_SECS, ROOCART_TIMEOUT_SECS,
  ROOCART_MAX_ITEM_ATTEMPTS, ROOCART_STORE_URL

Flags override the matching variables.
"#)]
#[command(version)]
pub struct Cli {
    /// Items file (JSON array of item objects).
    #[arg(long, short)]
    pub items: Option<PathBuf>,

    /// Seconds to wait after a rate limit.
    #[arg(long)]
    pub wait_secs: Option<u64>,

    /// Halt after this many unconfirmed submissions of one item.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_item_attempts: Option<u32>,

    /// Per-request timeout in seconds.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Base URL of the store API.
    #[arg(long)]
    pub store_url: Option<String>,

    /// Output format for the run summary.
    #[arg(long, short = 'f', default_value = "text")]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Quiet mode (no logging).
    #[arg(long, short)]
    pub quiet: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// The order went through.
    Success = 0,
    /// Setup failed or the run halted.
    Error = 1,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("roocart=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("roocart=info,warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let report = match run::run(&cli).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(ExitCode::Error as i32);
        }
    };

    match cli.format {
        OutputFormat::Text => println!("{}", TextFormatter::new(!cli.no_color).format_report(&report)),
        OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format_report(&report)?),
    }

    if !report.is_success() {
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}
