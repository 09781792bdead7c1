//! crashnotify - supervisor crash notification event listener
//!
//! CLI entry point: wires the stdio transport, the webhook dispatcher,
//! and the run loop together.

use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result, eyre};
use tracing::info;

use crashnotify::cli::Cli;
use crashnotify::config::Config;
use crashnotify::event::ProcessFilter;
use crashnotify::host;
use crashnotify::listener::Listener;
use crashnotify::notify::Dispatcher;
use crashnotify::protocol::EventStream;
use dingrobot::{Robot, RobotClient};

/// Environment variable the supervisor exports to its event listeners.
const SUPERVISOR_URL_ENV: &str = "SUPERVISOR_SERVER_URL";

fn setup_logging(verbose: bool) -> Result<()> {
    // stdout carries the event protocol; diagnostics must stay on stderr
    // or the framing would be corrupted.
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.apply_cli(&cli);

    // A listener only makes sense as a child of a supervisor; the event
    // protocol arrives on stdin.
    if std::env::var_os(SUPERVISOR_URL_ENV).is_none() {
        return Err(eyre!(
            "crashnotify must be run as a supervisor event listener ({} is not set)",
            SUPERVISOR_URL_ENV
        ));
    }

    let endpoint = config.webhook.endpoint().ok_or_else(|| {
        eyre!("No webhook credential configured. Pass -t/--access-token or set webhook.access-token.")
    })?;

    let robot: Arc<dyn Robot> = Arc::new(
        RobotClient::new(endpoint, config.webhook.timeout()).context("Failed to create webhook client")?,
    );
    let dispatcher = Dispatcher::new(robot, config.webhook.rate_policy());

    let filter = ProcessFilter::new(config.filter.programs.clone(), config.filter.any);
    let hostname = host::hostname();

    info!(
        %hostname,
        watched = ?config.filter.programs,
        any = config.filter.any,
        "listener starting"
    );

    let mut listener = Listener::new(
        EventStream::stdio(),
        filter,
        config.notify.subject_prefix.clone(),
        hostname,
        dispatcher,
    );

    listener.run().await.context("Event listener failed")?;
    Ok(())
}
