//! Create user command implementation.

use anyhow::Result;
use clap::Args;

use userdesk_core::{CreateUserInput, Role, Route};
use userdesk_http::ClientConfig;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Username to sign in with
    #[arg(long)]
    pub username: String,

    /// Email address
    #[arg(long)]
    pub email: String,

    /// Initial password
    #[arg(long)]
    pub password: String,

    /// City
    #[arg(long, default_value = "")]
    pub city: String,

    /// Role (user or admin)
    #[arg(long, default_value = "user")]
    pub role: Role,
}

pub async fn run(args: CreateArgs, config: &ClientConfig) -> Result<()> {
    let api = session::open_client(config)?;
    session::admit(Route::Admin, api.session())?;

    let input = CreateUserInput {
        name: args.name,
        username: args.username,
        email: args.email,
        password: args.password.into(),
        city: args.city,
        role: args.role,
    };

    let id = api
        .create_user(&input)
        .await
        .map_err(|e| output::notify(e, "Failed to create user"))?;

    output::success("User created successfully");
    output::field("User ID", &id.to_string());
    output::field("Username", &input.username);
    output::field("Role", input.role.as_str());

    Ok(())
}
