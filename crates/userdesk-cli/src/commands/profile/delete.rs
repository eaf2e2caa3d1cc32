//! Delete account command implementation.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;

use userdesk_core::Route;
use userdesk_http::{ClientConfig, flows};

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

pub async fn run(args: DeleteArgs, config: &ClientConfig) -> Result<()> {
    let api = session::open_client(config)?;
    session::admit(Route::Profile, api.session())?;

    if !args.force {
        eprint!("This will permanently delete your account. Continue? [y/N] ");
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            eprintln!("Aborted.");
            return Ok(());
        }
    }

    let next = flows::delete_account(&api)
        .await
        .map_err(|e| output::notify(e, "Failed to delete account"))?;

    output::success("Account deleted successfully");
    output::next_page(next);

    Ok(())
}
