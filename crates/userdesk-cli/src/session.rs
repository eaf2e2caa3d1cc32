//! Saved session and API client construction.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use tracing::debug;

use userdesk_core::{Route, SessionStore, navigate};
use userdesk_file::FileSessionStorage;
use userdesk_http::{ApiClient, ClientConfig};

/// Get the session file path.
pub fn session_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "userdesk").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("session.json"))
}

/// Open the saved session.
pub fn open_session() -> Result<SessionStore> {
    let path = session_path()?;
    debug!(path = %path.display(), "Opening session");
    SessionStore::open(FileSessionStorage::new(path)).context("Failed to load session")
}

/// Open the saved session and a client that authenticates with it.
pub fn open_client(config: &ClientConfig) -> Result<ApiClient> {
    let session = open_session()?;
    ApiClient::new(config, session).context("Failed to create API client")
}

/// Check that the saved session may see `page`.
pub fn admit(page: Route, session: &SessionStore) -> Result<()> {
    match navigate(page, session) {
        landed if landed == page => Ok(()),
        Route::Login => bail!(
            "Not signed in (redirected to {}). Run `userdesk auth login` first.",
            Route::Login
        ),
        landed => bail!(
            "{} requires an admin session (redirected to {})",
            page,
            landed
        ),
    }
}
