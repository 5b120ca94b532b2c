//! `ingresso-tui` — terminal booking form for the ingresso ticket bot.
//!
//! The form collects the event URL, CPF, ticket count, login credentials,
//! and the excluded stadium sections, submits them to the bot backend,
//! and shows status text — a single outcome message, or a live, capped
//! log when the push subscription is enabled.
//!
//! Logs are written to a file (default `/tmp/ingresso-tui.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, config resolution, tracing setup,
//! panic hooks, and the app launch.

mod action;
mod app;
mod event;
mod form;
mod theme;
mod tui;

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ingresso_api::{BotClient, TransportConfig};
use ingresso_core::{BookingSession, SessionConfig};

use crate::app::App;

/// Terminal booking form for the ingresso ticket bot.
#[derive(Parser, Debug)]
#[command(name = "ingresso-tui", version, about)]
struct Cli {
    /// Bot backend root URL (e.g. http://localhost:5000)
    #[arg(short = 's', long)]
    server_url: Option<String>,

    /// Status push endpoint (e.g. ws://localhost:5000/status)
    #[arg(long)]
    status_url: Option<String>,

    /// Disable the live status subscription
    #[arg(long)]
    no_live: bool,

    /// Config file path (defaults to the project config dir)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log file path (defaults to /tmp/ingresso-tui.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application to ensure logs are flushed.
fn setup_tracing(log_file: &Path, verbose: u8) -> WorkerGuard {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "ingresso_api={log_level},ingresso_core={log_level},ingresso_tui={log_level}"
        ))
    });

    let log_dir = log_file.parent().unwrap_or(Path::new("/tmp"));
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("ingresso-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Merge CLI flag overrides on top of the loaded configuration.
fn resolve_config(cli: &Cli) -> Result<ingresso_config::Config> {
    let mut config = ingresso_config::load(cli.config.as_deref())?;

    if let Some(ref url) = cli.server_url {
        config.server_url.clone_from(url);
    }
    if let Some(ref url) = cli.status_url {
        config.status_url.clone_from(url);
    }
    if cli.no_live {
        config.live_updates = false;
    }
    if let Some(ref path) = cli.log_file {
        config.log_file.clone_from(path);
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    let config = resolve_config(&cli)?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&config.log_file, cli.verbose);

    info!(
        server = %config.server_url,
        live = config.live_updates,
        "starting ingresso-tui"
    );

    let endpoints = config.endpoints()?;

    let mut transport = TransportConfig::default();
    if let Some(secs) = config.timeout_secs {
        transport = transport.with_timeout_secs(secs);
    }

    let client = BotClient::new(endpoints.server, &transport)?;
    let session = BookingSession::new(
        client,
        SessionConfig {
            status_url: endpoints.status,
            live_updates: config.live_updates,
        },
    );

    // Live updates are best-effort at startup: a dead status endpoint
    // must not take the form down with it.
    if let Err(e) = session.start_live_updates().await {
        warn!(error = %e, "live status unavailable");
        session.record_status("Live status unavailable.");
    }

    let mut app = App::new(session.clone());
    let result = app.run().await;

    // The subscription is released on this path however the app ended.
    session.shutdown().await;
    result
}
