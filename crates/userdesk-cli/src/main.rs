//! userdesk - command-line client for the userdesk user-management API.
//!
//! Each subcommand stands in for one page of the web client: it checks the
//! page's admission guard against the saved session, runs the page's action
//! and reports the outcome as a notification.

mod cli;
mod commands;
mod output;
mod session;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{admin, auth, profile};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let settings = cli.settings();
    let result = match cli.command {
        Commands::Auth(cmd) => auth::handle(cmd, &settings).await,
        Commands::Profile(cmd) => profile::handle(cmd, &settings).await,
        Commands::Admin(cmd) => admin::handle(cmd, &settings).await,
    };

    if let Err(e) = result {
        output::error(&output::report(&e));
        std::process::exit(1);
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
