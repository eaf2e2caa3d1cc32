//! Client configuration.

use std::time::Duration;

use userdesk_core::ApiUrl;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("userdesk/", env!("CARGO_PKG_VERSION"));

/// Settings for the HTTP transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API.
    pub api_url: ApiUrl,
    /// Per-request timeout. `None` leaves the HTTP client's default (no timeout).
    pub timeout: Option<Duration>,
    /// User agent header value.
    pub user_agent: String,
}

impl ClientConfig {
    /// Configuration for `api_url` with no timeout.
    pub fn new(api_url: ApiUrl) -> Self {
        Self {
            api_url,
            timeout: None,
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Set a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
