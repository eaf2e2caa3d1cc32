//! Resource access functions.
//!
//! One method per endpoint. Each builds a fixed method, path and body and
//! hands it to the [`AuthedTransport`]; failures are whatever the transport
//! produced.

use tracing::instrument;

use userdesk_core::error::AuthError;
use userdesk_core::{
    CreateUserInput, Credential, Credentials, Result, SessionStore, SignUpInput, User, UserId,
    UserUpdate,
};

use crate::config::ClientConfig;
use crate::rest::{
    ADMIN_USERS, CreatedResponse, SIGN_IN, SIGN_UP, TokenResponse, admin_user_path, user_path,
};
use crate::transport::{AuthedTransport, PendingRequest};

/// Typed client for the user-management API.
///
/// # Example
///
/// ```no_run
/// use userdesk_core::{ApiUrl, Credentials, SessionStore};
/// use userdesk_http::{ApiClient, ClientConfig};
///
/// # async fn example() -> Result<(), userdesk_core::Error> {
/// let session = SessionStore::in_memory();
/// let config = ClientConfig::new(ApiUrl::new("http://localhost:8080")?);
/// let api = ApiClient::new(&config, session.clone())?;
///
/// let credential = api.sign_in(&Credentials::new("alice", "secret")).await?;
/// session.set_credential(Some(credential.as_str()))?;
///
/// let me = api.get_self().await?;
/// println!("{} <{}>", me.username, me.email);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    transport: AuthedTransport,
}

impl ApiClient {
    /// Create a client for the configured API, authenticating with `session`.
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self> {
        Ok(Self {
            transport: AuthedTransport::new(config, session)?,
        })
    }

    /// The session this client authenticates with.
    pub fn session(&self) -> &SessionStore {
        self.transport.session()
    }

    /// The underlying transport.
    pub fn transport(&self) -> &AuthedTransport {
        &self.transport
    }

    /// Path of the signed-in user's own record.
    fn self_path(&self) -> Result<String> {
        let id = self.session().subject_id().ok_or(AuthError::NoSession)?;
        Ok(user_path(id))
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Exchange a username and password for a credential.
    ///
    /// The session is not modified.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Credential> {
        let request = PendingRequest::post(SIGN_IN, credentials)?;
        let body: TokenResponse = self.transport.send_json(request).await?;
        Ok(Credential::new(body.access_token))
    }

    /// Create an account. Returns the new user's id.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn sign_up(&self, input: &SignUpInput) -> Result<UserId> {
        let request = PendingRequest::post(SIGN_UP, input)?;
        let body: CreatedResponse = self.transport.send_json(request).await?;
        Ok(body.id)
    }

    /// Obtain a fresh credential from the server session.
    ///
    /// The session is not modified.
    pub async fn refresh(&self) -> Result<Credential> {
        self.transport.refresh_credential().await
    }

    // ========================================================================
    // Self-service
    // ========================================================================

    /// Fetch the signed-in user's record.
    #[instrument(skip(self))]
    pub async fn get_self(&self) -> Result<User> {
        let request = PendingRequest::get(self.self_path()?);
        self.transport.send_json(request).await
    }

    /// Change fields of the signed-in user's record.
    #[instrument(skip(self, update))]
    pub async fn update_self(&self, update: &UserUpdate) -> Result<()> {
        let request = PendingRequest::put(self.self_path()?, update)?;
        self.transport.send_no_content(request).await
    }

    /// Delete the signed-in user's account.
    ///
    /// The session is not modified.
    #[instrument(skip(self))]
    pub async fn delete_self(&self) -> Result<()> {
        let request = PendingRequest::delete(self.self_path()?);
        self.transport.send_no_content(request).await
    }

    // ========================================================================
    // Administration
    // ========================================================================

    /// List every user.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let users: Option<Vec<User>> = self
            .transport
            .send_json(PendingRequest::get(ADMIN_USERS))
            .await?;
        Ok(users.unwrap_or_default())
    }

    /// Fetch one user.
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: UserId) -> Result<User> {
        self.transport
            .send_json(PendingRequest::get(admin_user_path(id)))
            .await
    }

    /// Create a user. Returns the new user's id.
    #[instrument(skip(self, input), fields(username = %input.username, role = %input.role))]
    pub async fn create_user(&self, input: &CreateUserInput) -> Result<UserId> {
        let request = PendingRequest::post(ADMIN_USERS, input)?;
        let body: CreatedResponse = self.transport.send_json(request).await?;
        Ok(body.id)
    }

    /// Change fields of a user.
    #[instrument(skip(self, update))]
    pub async fn update_user(&self, id: UserId, update: &UserUpdate) -> Result<()> {
        let request = PendingRequest::put(admin_user_path(id), update)?;
        self.transport.send_no_content(request).await
    }

    /// Delete a user.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: UserId) -> Result<()> {
        self.transport
            .send_no_content(PendingRequest::delete(admin_user_path(id)))
            .await
    }
}
