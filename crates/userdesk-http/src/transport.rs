//! Authenticated transport with a single re-authentication retry.

use std::fmt;
use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use userdesk_core::error::{AuthError, Error, InvalidInputError};
use userdesk_core::{Credential, Result, SessionStore};

use crate::config::ClientConfig;
use crate::rest::{REFRESH, RestClient, TokenResponse};

/// An outbound call that has not resolved yet.
///
/// `retried` starts false and is set at most once, when the transport
/// re-sends the call after refreshing the credential.
#[derive(Clone)]
pub struct PendingRequest {
    method: Method,
    target: String,
    payload: Option<serde_json::Value>,
    retried: bool,
}

impl PendingRequest {
    /// A request with no body.
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            payload: None,
            retried: false,
        }
    }

    /// A request with a JSON body.
    pub fn with_payload<B: Serialize>(
        method: Method,
        target: impl Into<String>,
        payload: &B,
    ) -> Result<Self> {
        let payload = serde_json::to_value(payload).map_err(|e| InvalidInputError::Other {
            message: format!("request body: {}", e),
        })?;
        Ok(Self {
            payload: Some(payload),
            ..Self::new(method, target)
        })
    }

    pub fn get(target: impl Into<String>) -> Self {
        Self::new(Method::GET, target)
    }

    pub fn delete(target: impl Into<String>) -> Self {
        Self::new(Method::DELETE, target)
    }

    pub fn post<B: Serialize>(target: impl Into<String>, payload: &B) -> Result<Self> {
        Self::with_payload(Method::POST, target, payload)
    }

    pub fn put<B: Serialize>(target: impl Into<String>, payload: &B) -> Result<Self> {
        Self::with_payload(Method::PUT, target, payload)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the API base URL.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.payload.as_ref()
    }

    /// Whether this request has already been re-sent after a refresh.
    pub fn retried(&self) -> bool {
        self.retried
    }
}

// Bodies may carry passwords
impl fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("method", &self.method)
            .field("target", &self.target)
            .field("payload", &self.payload.as_ref().map(|_| "[REDACTED]"))
            .field("retried", &self.retried)
            .finish()
    }
}

/// Attaches the session credential to outbound calls and recovers once from
/// an expired credential.
///
/// On a 401 the transport refreshes the credential through `/auth/refresh`
/// and re-sends the call a single time. A failed refresh clears the session
/// and yields [`AuthError::SessionExpired`]. Every other failure, including a
/// second 401, is returned unchanged.
///
/// Refreshes are single-flight: concurrent requests rejected with the same
/// credential share one refresh call.
///
/// The session store owns the server session state. Once it holds none,
/// for instance after [`SessionStore::clear`], the cookie jar is emptied
/// before the next call, so a long-lived transport never replays the
/// refresh cookie of a signed-out user.
#[derive(Clone)]
pub struct AuthedTransport {
    inner: Arc<TransportInner>,
}

struct TransportInner {
    rest: RestClient,
    session: SessionStore,
    refresh_lock: Mutex<()>,
}

impl AuthedTransport {
    /// Create a transport bound to `session`.
    ///
    /// Server session state remembered by the store (the refresh cookie) is
    /// loaded into the cookie jar.
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self> {
        let rest = RestClient::new(config)?;
        if let Some(state) = session.server_state() {
            rest.seed_cookies(&state);
        }

        Ok(Self {
            inner: Arc::new(TransportInner {
                rest,
                session,
                refresh_lock: Mutex::new(()),
            }),
        })
    }

    /// The session this transport authenticates with.
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Send a request and return the success response.
    #[instrument(skip(self, request), fields(method = %request.method, target = %request.target))]
    pub async fn send(&self, mut request: PendingRequest) -> Result<reqwest::Response> {
        loop {
            self.forget_cleared_cookies();
            let credential = self.inner.session.current_credential();
            let result = self.inner.rest.dispatch(&request, credential.as_ref()).await;
            self.remember_server_state();

            match result {
                Err(err) if err.is_unauthorized() && !request.retried => {
                    debug!("Credential rejected, refreshing once");
                    request.retried = true;
                    self.recover(credential).await?;
                }
                other => return other,
            }
        }
    }

    /// Send a request and decode its JSON body.
    pub async fn send_json<R: DeserializeOwned>(&self, request: PendingRequest) -> Result<R> {
        let response = self.send(request).await?;
        RestClient::decode(response).await
    }

    /// Send a request whose response body is not needed.
    pub async fn send_no_content(&self, request: PendingRequest) -> Result<()> {
        self.send(request).await.map(drop)
    }

    /// Obtain a new credential from `/auth/refresh`.
    ///
    /// The call is sent once and never retried; the session is not modified.
    #[instrument(skip(self))]
    pub async fn refresh_credential(&self) -> Result<Credential> {
        let request = PendingRequest::get(REFRESH);
        self.forget_cleared_cookies();
        let credential = self.inner.session.current_credential();

        let response = self.inner.rest.dispatch(&request, credential.as_ref()).await?;
        self.remember_server_state();

        let body: TokenResponse = RestClient::decode(response).await?;
        Ok(Credential::new(body.access_token))
    }

    /// Replace `rejected` with a fresh credential, or clear the session.
    async fn recover(&self, rejected: Option<Credential>) -> Result<()> {
        let _flight = self.inner.refresh_lock.lock().await;

        let current = self.inner.session.current_credential();
        if current != rejected {
            return match current {
                Some(_) => {
                    debug!("Credential already refreshed by a concurrent request");
                    Ok(())
                }
                None => Err(AuthError::SessionExpired { cause: None }.into()),
            };
        }

        let outcome = match self.refresh_credential().await {
            Ok(fresh) => self.inner.session.set_credential(Some(fresh.as_str())),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(()) => {
                info!("Session refreshed");
                Ok(())
            }
            Err(cause) => {
                warn!(error = %cause, "Refresh failed, clearing session");
                if let Err(e) = self.inner.session.clear() {
                    warn!(error = %e, "Failed to clear session");
                }
                Err(Error::Auth(AuthError::SessionExpired {
                    cause: Some(Box::new(cause)),
                }))
            }
        }
    }

    fn forget_cleared_cookies(&self) {
        if self.inner.session.server_state().is_none() {
            self.inner.rest.clear_cookies();
        }
    }

    /// Mirror the cookie jar into the session store.
    fn remember_server_state(&self) {
        let Some(cookies) = self.inner.rest.cookies() else {
            return;
        };
        if let Err(e) = self.inner.session.set_server_state(Some(cookies)) {
            warn!(error = %e, "Failed to persist server session state");
        }
    }
}

impl fmt::Debug for AuthedTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthedTransport")
            .field("api", self.inner.rest.base())
            .field("session", &self.inner.session)
            .finish()
    }
}
