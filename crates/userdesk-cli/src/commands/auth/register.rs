//! Register command implementation.

use anyhow::Result;
use clap::Args;

use userdesk_core::SignUpInput;
use userdesk_http::{ClientConfig, flows};

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Username to sign in with
    #[arg(long)]
    pub username: String,

    /// Email address
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// City
    #[arg(long, default_value = "")]
    pub city: String,
}

pub async fn run(args: RegisterArgs, config: &ClientConfig) -> Result<()> {
    let api = session::open_client(config)?;

    let input = SignUpInput {
        name: args.name,
        username: args.username,
        email: args.email,
        password: args.password.into(),
        city: args.city,
    };

    let (id, next) = flows::register(&api, &input)
        .await
        .map_err(|e| output::notify(e, "Failed to register"))?;

    output::success(&format!("Registered {}", input.username));
    output::field("User ID", &id.to_string());
    output::next_page(next);

    Ok(())
}
