//! Admin panel subcommands. All require an admin session.

mod create;
mod delete;
mod get;
mod list;
mod update;

use anyhow::Result;
use clap::{Args, Subcommand};

use userdesk_http::ClientConfig;

#[derive(Args, Debug)]
pub struct AdminCommand {
    #[command(subcommand)]
    pub command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AdminSubcommand {
    /// List all users
    List(list::ListArgs),

    /// Show one user
    Get(get::GetArgs),

    /// Create a user
    Create(create::CreateArgs),

    /// Change fields of a user
    Update(update::UpdateArgs),

    /// Delete a user
    Delete(delete::DeleteArgs),
}

pub async fn handle(cmd: AdminCommand, config: &ClientConfig) -> Result<()> {
    match cmd.command {
        AdminSubcommand::List(args) => list::run(args, config).await,
        AdminSubcommand::Get(args) => get::run(args, config).await,
        AdminSubcommand::Create(args) => create::run(args, config).await,
        AdminSubcommand::Update(args) => update::run(args, config).await,
        AdminSubcommand::Delete(args) => delete::run(args, config).await,
    }
}
