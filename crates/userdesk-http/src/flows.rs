//! Page flows: the steps a page runs for a user action, and where it goes next.

use tracing::info;

use userdesk_core::{Credentials, Result, Route, SessionStore, SignUpInput, UserId};

use crate::api::ApiClient;

/// Sign in and store the issued credential.
pub async fn sign_in(api: &ApiClient, credentials: &Credentials) -> Result<Route> {
    let credential = api.sign_in(credentials).await?;
    api.session().set_credential(Some(credential.as_str()))?;
    info!(username = %credentials.username(), "Signed in");
    Ok(Route::Home)
}

/// Create an account; the user signs in afterwards.
pub async fn register(api: &ApiClient, input: &SignUpInput) -> Result<(UserId, Route)> {
    let id = api.sign_up(input).await?;
    info!(%id, username = %input.username, "Registered");
    Ok((id, Route::Login))
}

/// Forget the session.
///
/// Transports built on `session` stay usable: their next call goes out
/// without the credential or the refresh cookie.
pub fn sign_out(session: &SessionStore) -> Result<Route> {
    session.clear()?;
    Ok(Route::Login)
}

/// Delete the signed-in account, then forget the session.
///
/// The session is only cleared once the server confirmed the deletion.
pub async fn delete_account(api: &ApiClient) -> Result<Route> {
    api.delete_self().await?;
    api.session().clear()?;
    info!("Account deleted");
    Ok(Route::Login)
}
