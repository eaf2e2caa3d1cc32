//! API base URL type.

use std::fmt;
use std::str::FromStr;

use url::{Host, Url};

use crate::error::{Error, InvalidInputError};

/// Default backend address used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Base URL of the user-management API.
///
/// Only `https` is accepted, except on loopback hosts where the backend
/// usually runs on plain `http` during development. The stored path always
/// ends in `/`, so the `/auth/*`, `/api/*` and `/admin/*` endpoints land
/// under any prefix the backend is mounted at.
///
/// # Example
///
/// ```
/// use userdesk_core::ApiUrl;
///
/// let api = ApiUrl::new("https://example.com/backend").unwrap();
/// assert_eq!(api.endpoint("/auth/sign-in"), "https://example.com/backend/auth/sign-in");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl {
    base: Url,
}

impl ApiUrl {
    /// Parse and check a base URL.
    pub fn new(value: &str) -> Result<Self, Error> {
        let reject = |reason: String| {
            Error::from(InvalidInputError::ApiUrl {
                value: value.to_string(),
                reason,
            })
        };

        let mut base = Url::parse(value).map_err(|e| reject(e.to_string()))?;

        let Some(host) = base.host() else {
            return Err(reject("missing host".into()));
        };
        match (base.scheme(), is_loopback(&host)) {
            ("https", _) | ("http", true) => {}
            ("http", false) => {
                return Err(reject("plain http is only allowed for loopback hosts".into()));
            }
            (scheme, _) => return Err(reject(format!("unsupported scheme '{}'", scheme))),
        }

        if base.query().is_some() || base.fragment().is_some() {
            return Err(reject("query and fragment are not allowed".into()));
        }

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { base })
    }

    /// Absolute URL of an endpoint such as `/admin/users`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    pub fn as_str(&self) -> &str {
        self.base.as_str()
    }

    /// The base URL, used to scope cookies.
    pub fn as_url(&self) -> &Url {
        &self.base
    }

    pub fn host(&self) -> Option<&str> {
        self.base.host_str()
    }
}

fn is_loopback(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(name) => name.eq_ignore_ascii_case("localhost"),
        Host::Ipv4(addr) => addr.is_loopback(),
        Host::Ipv6(addr) => addr.is_loopback(),
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.base.fmt(f)
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
