//! Get user command implementation.

use anyhow::Result;
use clap::Args;

use userdesk_core::{Route, UserId};
use userdesk_http::ClientConfig;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// User id
    pub id: UserId,

    /// Print the record as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: GetArgs, config: &ClientConfig) -> Result<()> {
    let api = session::open_client(config)?;
    session::admit(Route::Admin, api.session())?;

    let user = api
        .get_user(args.id)
        .await
        .map_err(|e| output::notify(e, "Failed to fetch user"))?;

    if args.json {
        output::json_pretty(&user)
    } else {
        output::user(&user);
        Ok(())
    }
}
