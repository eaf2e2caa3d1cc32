//! Update user command implementation.

use anyhow::{Result, bail};
use clap::Args;

use userdesk_core::{Role, Route, UserId, UserUpdate};
use userdesk_http::ClientConfig;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// User id
    pub id: UserId,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    /// New role (user or admin)
    #[arg(long)]
    pub role: Option<Role>,
}

pub async fn run(args: UpdateArgs, config: &ClientConfig) -> Result<()> {
    let api = session::open_client(config)?;
    session::admit(Route::Admin, api.session())?;

    let update = UserUpdate {
        name: args.name,
        username: args.username,
        email: args.email,
        password: args.password.map(Into::into),
        city: args.city,
        role: args.role,
    };
    if update.is_empty() {
        bail!("Nothing to update for user {}", args.id);
    }

    api.update_user(args.id, &update)
        .await
        .map_err(|e| output::notify(e, "Failed to update user"))?;

    output::success("User updated successfully");

    Ok(())
}
