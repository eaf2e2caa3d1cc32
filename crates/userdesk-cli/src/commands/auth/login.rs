//! Login command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use userdesk_core::{Credentials, navigate};
use userdesk_http::{ClientConfig, flows};

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account username
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

pub async fn run(args: LoginArgs, config: &ClientConfig) -> Result<()> {
    let api = session::open_client(config)?;
    let credentials = Credentials::new(&args.username, args.password);

    eprintln!("{}", "Logging in...".dimmed());

    let next = flows::sign_in(&api, &credentials)
        .await
        .map_err(|e| output::notify(e, "Failed to login"))?;

    output::success(&format!("Logged in as {}", args.username));
    println!();
    if let Some(claims) = api.session().claims() {
        output::field("User ID", &claims.subject_id().to_string());
        output::field("Role", claims.role().as_str());
    }
    output::field("API", config.api_url.as_str());

    output::next_page(navigate(next, api.session()));

    Ok(())
}
