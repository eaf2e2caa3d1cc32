//! CLI argument definitions.

use std::time::Duration;

use clap::{Parser, Subcommand};

use userdesk_core::ApiUrl;
use userdesk_core::types::DEFAULT_API_URL;
use userdesk_http::ClientConfig;

use crate::commands::admin::AdminCommand;
use crate::commands::auth::AuthCommand;
use crate::commands::profile::ProfileCommand;

/// Command-line client for the userdesk user-management API.
#[derive(Parser, Debug)]
#[command(name = "userdesk")]
#[command(author, version = env!("USERDESK_VERSION"), about, long_about = None)]
pub struct Cli {
    /// API base URL
    #[arg(long, global = true, env = "USERDESK_API", default_value = DEFAULT_API_URL)]
    pub api: ApiUrl,

    /// Request timeout in seconds (no timeout by default)
    #[arg(long, global = true, env = "USERDESK_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Transport settings from the global flags.
    pub fn settings(&self) -> ClientConfig {
        let config = ClientConfig::new(self.api.clone());
        match self.timeout {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in, register and manage the saved session
    Auth(AuthCommand),

    /// View and edit your own account
    Profile(ProfileCommand),

    /// Manage all users (admin only)
    Admin(AdminCommand),
}
