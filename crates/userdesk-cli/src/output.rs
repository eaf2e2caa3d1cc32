//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use userdesk_core::{Error, ErrorKind, Route, User};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Render an error and its causes on one line.
///
/// Errors that embed their source in their own message are not repeated.
pub fn report(err: &anyhow::Error) -> String {
    let mut text = err.to_string();
    for cause in err.chain().skip(1) {
        let cause = cause.to_string();
        if !text.ends_with(&cause) {
            text.push_str(": ");
            text.push_str(&cause);
        }
    }
    text
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a dimmed hint to stderr.
pub fn hint(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print the fields of a user record.
pub fn user(user: &User) {
    field("ID", &user.id.to_string());
    field("Name", &user.name);
    field("Username", &user.username);
    field("Email", &user.email);
    field("City", user.city.as_deref().unwrap_or("-"));
    field("Role", user.role.as_str());
}

/// Tell the user which page comes next.
pub fn next_page(route: Route) {
    let command = match route {
        Route::Login => "userdesk auth login",
        Route::Register => "userdesk auth register",
        Route::Home | Route::Profile => "userdesk profile show",
        Route::Admin => "userdesk admin list",
    };
    hint(&format!("Next: {} (run `{}`)", route, command));
}

/// Turn an API failure into the notification shown to the user.
///
/// The server's message is preferred; `fallback` is used when there is none.
pub fn notify(err: Error, fallback: &str) -> anyhow::Error {
    tracing::error!(error = %err, kind = ?err.kind(), "{}", fallback);

    let message = err.user_message(fallback).to_string();
    match err.kind() {
        ErrorKind::SessionExpired => {
            anyhow::anyhow!("{} (session expired, run `userdesk auth login`)", message)
        }
        ErrorKind::Network => anyhow::anyhow!("{}: {}", message, err),
        _ => anyhow::anyhow!(message),
    }
}
