//! List users command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use userdesk_core::Route;
use userdesk_http::ClientConfig;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print one JSON record per line
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ListArgs, config: &ClientConfig) -> Result<()> {
    let api = session::open_client(config)?;
    session::admit(Route::Admin, api.session())?;

    let users = api
        .list_users()
        .await
        .map_err(|e| output::notify(e, "Failed to fetch users"))?;

    if users.is_empty() {
        eprintln!("{}", "No users found.".dimmed());
        return Ok(());
    }

    if args.json {
        for user in &users {
            output::json(user)?;
        }
        return Ok(());
    }

    println!(
        "{:>6}  {:<16} {:<24} {:<28} {:<14} {}",
        "ID".bold(),
        "USERNAME".bold(),
        "NAME".bold(),
        "EMAIL".bold(),
        "CITY".bold(),
        "ROLE".bold()
    );
    for user in &users {
        println!(
            "{:>6}  {:<16} {:<24} {:<28} {:<14} {}",
            user.id,
            user.username,
            user.name,
            user.email,
            user.city.as_deref().unwrap_or("-"),
            user.role
        );
    }

    Ok(())
}
