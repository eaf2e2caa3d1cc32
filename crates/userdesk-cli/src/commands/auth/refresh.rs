//! Refresh command implementation.

use anyhow::{Context, Result};
use clap::Args;

use userdesk_http::ClientConfig;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RefreshArgs {}

pub async fn run(_args: RefreshArgs, config: &ClientConfig) -> Result<()> {
    let api = session::open_client(config)?;

    let credential = api
        .refresh()
        .await
        .map_err(|e| output::notify(e, "Failed to refresh session"))?;

    api.session()
        .set_credential(Some(credential.as_str()))
        .context("Failed to save refreshed session")?;

    output::success("Session refreshed");
    if let Some(expiry) = api.session().claims().and_then(|c| c.expiry()) {
        output::field("Expires", &expiry.to_rfc3339());
    }

    Ok(())
}
