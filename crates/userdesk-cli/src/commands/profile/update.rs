//! Update profile command implementation.

use anyhow::{Result, bail};
use clap::Args;

use userdesk_core::{Route, UserUpdate};
use userdesk_http::ClientConfig;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// New display name
    #[arg(long)]
    pub name: Option<String>,

    /// New username
    #[arg(long)]
    pub username: Option<String>,

    /// New email address
    #[arg(long)]
    pub email: Option<String>,

    /// New password
    #[arg(long)]
    pub password: Option<String>,

    /// New city
    #[arg(long)]
    pub city: Option<String>,
}

impl From<UpdateArgs> for UserUpdate {
    fn from(args: UpdateArgs) -> Self {
        UserUpdate {
            name: args.name,
            username: args.username,
            email: args.email,
            password: args.password.map(Into::into),
            city: args.city,
            role: None,
        }
    }
}

pub async fn run(args: UpdateArgs, config: &ClientConfig) -> Result<()> {
    let api = session::open_client(config)?;
    session::admit(Route::Profile, api.session())?;

    let update = UserUpdate::from(args);
    if update.is_empty() {
        bail!("Nothing to update. Pass at least one of --name, --username, --email, --password, --city.");
    }

    api.update_self(&update)
        .await
        .map_err(|e| output::notify(e, "Failed to update profile"))?;

    output::success("Profile updated successfully");

    Ok(())
}
