//! REST HTTP client implementation.

use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};

use userdesk_core::error::{ApiError, Error, TransportError};
use userdesk_core::{ApiUrl, Credential, Result};

use super::endpoints::ErrorResponse;
use crate::config::ClientConfig;
use crate::transport::PendingRequest;

/// Map a reqwest failure to a transport error.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let message = err.to_string();
    let err = if err.is_timeout() {
        TransportError::Timeout { message }
    } else if err.is_connect() {
        TransportError::Connection { message }
    } else if err.is_decode() {
        TransportError::Decode { message }
    } else {
        TransportError::Http { message }
    };
    Error::Transport(err)
}

/// Cookie jar that can be emptied while the client holding it lives on.
#[derive(Debug, Default)]
struct SessionCookies {
    jar: RwLock<Jar>,
}

impl SessionCookies {
    fn clear(&self) {
        *self.jar.write() = Jar::default();
    }
}

impl CookieStore for SessionCookies {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        self.jar.read().set_cookies(cookie_headers, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.read().cookies(url)
    }
}

/// HTTP client for the user-management API.
///
/// Sends exactly one request per call. Cookies set by the server (the
/// refresh cookie) are kept in an in-memory jar scoped to the base URL.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base: ApiUrl,
    jar: Arc<SessionCookies>,
}

impl RestClient {
    /// Create a new client for the configured API.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let jar = Arc::new(SessionCookies::default());

        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .cookie_provider(Arc::clone(&jar));

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| TransportError::Setup {
            message: e.to_string(),
        })?;

        Ok(Self {
            client,
            base: config.api_url.clone(),
            jar,
        })
    }

    /// Returns the base URL this client is configured for.
    pub fn base(&self) -> &ApiUrl {
        &self.base
    }

    /// Send a request, attaching `credential` as a bearer token if given.
    ///
    /// Non-success statuses are returned as [`Error::Api`].
    #[instrument(skip(self, request, credential), fields(api = %self.base))]
    pub async fn dispatch(
        &self,
        request: &PendingRequest,
        credential: Option<&Credential>,
    ) -> Result<reqwest::Response> {
        let url = self.base.endpoint(request.target());
        debug!(method = %request.method(), %url, authenticated = credential.is_some(), "HTTP request");

        let mut builder = self
            .client
            .request(request.method().clone(), &url)
            .header(ACCEPT, "application/json");

        if let Some(credential) = credential {
            builder = builder.header(AUTHORIZATION, credential.bearer());
        }

        if let Some(payload) = request.payload() {
            builder = builder.json(payload);
        }

        let response = builder.send().await.map_err(transport_error)?;

        let status = response.status();
        trace!(status = %status, "HTTP response");

        if status.is_success() {
            Ok(response)
        } else {
            Err(Error::Api(Self::parse_error_response(response).await))
        }
    }

    /// Decode a success response body.
    pub async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
        response.json::<R>().await.map_err(|e| {
            Error::Transport(TransportError::Decode {
                message: e.to_string(),
            })
        })
    }

    /// The `Cookie` header the jar would send to the API, if any.
    pub fn cookies(&self) -> Option<String> {
        self.jar
            .cookies(self.base.as_url())
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Load cookies from a previously saved `Cookie` header.
    pub fn seed_cookies(&self, header: &str) {
        let jar = self.jar.jar.read();
        for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            jar.add_cookie_str(pair, self.base.as_url());
        }
    }

    /// Drop every cookie the server has set.
    pub fn clear_cookies(&self) {
        self.jar.clear();
    }

    /// Parse an API error response.
    async fn parse_error_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();

        match response.json::<ErrorResponse>().await {
            Ok(body) => ApiError::new(status, body.message.filter(|m| !m.is_empty())),
            Err(_) => ApiError::new(status, None),
        }
    }
}
