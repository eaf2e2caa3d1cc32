//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;

use userdesk_http::flows;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub fn run(_args: LogoutArgs) -> Result<()> {
    let store = session::open_session()?;
    let was_signed_in = store.is_authenticated();

    let next = flows::sign_out(&store).context("Failed to clear session")?;

    if was_signed_in {
        output::success("Logged out");
    } else {
        output::success("No active session");
    }
    output::next_page(next);

    Ok(())
}
