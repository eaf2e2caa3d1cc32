//! Show profile command implementation.

use anyhow::Result;
use clap::Args;

use userdesk_core::Route;
use userdesk_http::ClientConfig;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print the record as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ShowArgs, config: &ClientConfig) -> Result<()> {
    let api = session::open_client(config)?;
    session::admit(Route::Profile, api.session())?;

    let me = api
        .get_self()
        .await
        .map_err(|e| output::notify(e, "Failed to load user data"))?;

    if args.json {
        output::json_pretty(&me)
    } else {
        output::user(&me);
        Ok(())
    }
}
