//! Delete user command implementation.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;

use userdesk_core::{Route, UserId};
use userdesk_http::ClientConfig;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// User id
    pub id: UserId,

    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

pub async fn run(args: DeleteArgs, config: &ClientConfig) -> Result<()> {
    let api = session::open_client(config)?;
    session::admit(Route::Admin, api.session())?;

    if !args.force {
        eprint!("This will delete user {}. Continue? [y/N] ", args.id);
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            eprintln!("Aborted.");
            return Ok(());
        }
    }

    api.delete_user(args.id)
        .await
        .map_err(|e| output::notify(e, "Failed to delete user"))?;

    output::success("User deleted successfully");

    Ok(())
}
