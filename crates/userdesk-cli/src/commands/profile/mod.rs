//! Profile page subcommands. All require a session.

mod delete;
mod show;
mod update;

use anyhow::Result;
use clap::{Args, Subcommand};

use userdesk_http::ClientConfig;

#[derive(Args, Debug)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileSubcommand {
    /// Show your account
    Show(show::ShowArgs),

    /// Change fields of your account
    Update(update::UpdateArgs),

    /// Delete your account and sign out
    Delete(delete::DeleteArgs),
}

pub async fn handle(cmd: ProfileCommand, config: &ClientConfig) -> Result<()> {
    match cmd.command {
        ProfileSubcommand::Show(args) => show::run(args, config).await,
        ProfileSubcommand::Update(args) => update::run(args, config).await,
        ProfileSubcommand::Delete(args) => delete::run(args, config).await,
    }
}
