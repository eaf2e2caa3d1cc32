//! Sign-in, registration and session subcommands.

mod login;
mod logout;
mod refresh;
mod register;
mod whoami;

use anyhow::Result;
use clap::{Args, Subcommand};

use userdesk_http::ClientConfig;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Sign in with a username and password
    Login(login::LoginArgs),

    /// Create a new account
    Register(register::RegisterArgs),

    /// Forget the saved session
    Logout(logout::LogoutArgs),

    /// Display the saved session
    Whoami(whoami::WhoamiArgs),

    /// Obtain a fresh credential for the saved session
    Refresh(refresh::RefreshArgs),
}

pub async fn handle(cmd: AuthCommand, config: &ClientConfig) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login(args) => login::run(args, config).await,
        AuthSubcommand::Register(args) => register::run(args, config).await,
        AuthSubcommand::Logout(args) => logout::run(args),
        AuthSubcommand::Whoami(args) => whoami::run(args, config),
        AuthSubcommand::Refresh(args) => refresh::run(args, config).await,
    }
}
