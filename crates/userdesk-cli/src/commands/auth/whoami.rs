//! Whoami command implementation.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use userdesk_core::{Role, UserId};
use userdesk_http::ClientConfig;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the session as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct SessionSummary {
    id: UserId,
    role: Role,
    issued_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    api: String,
}

pub fn run(args: WhoamiArgs, config: &ClientConfig) -> Result<()> {
    let store = session::open_session()?;
    let claims = store
        .claims()
        .context("No active session. Run `userdesk auth login` first.")?;

    let summary = SessionSummary {
        id: claims.subject_id(),
        role: claims.role(),
        issued_at: claims.issued_at(),
        expires_at: claims.expiry(),
        api: config.api_url.to_string(),
    };

    if args.json {
        return output::json(&summary);
    }

    output::field("User ID", &summary.id.to_string());
    output::field("Role", summary.role.as_str());
    if let Some(issued) = summary.issued_at {
        output::field("Issued", &issued.to_rfc3339());
    }
    if let Some(expiry) = summary.expires_at {
        let mut shown = expiry.to_rfc3339();
        if claims.is_expired_at(Utc::now()) {
            shown = format!("{} {}", shown, "(expired)".yellow());
        }
        output::field("Expires", &shown);
    }
    output::field("API", &summary.api);

    Ok(())
}
