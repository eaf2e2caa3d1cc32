//! Credential token and the identity claims decoded from it.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::error::{AuthError, Error};
use crate::types::{Role, UserId};

/// A signed access token (compact JWT) representing an authenticated session.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - The signature is not verified client-side; the server is the authority
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw token without inspecting it.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for use in authorization headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value for this token.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"[REDACTED]").finish()
    }
}

/// Identity fields decoded from a [`Credential`].
///
/// Claims are produced only by [`Claims::decode`] and are never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Claims {
    subject_id: UserId,
    role: Role,
    expiry: Option<DateTime<Utc>>,
    issued_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RawClaims {
    sub: UserId,
    role: Role,
    #[serde(default)]
    exp: Option<i64>,
    #[serde(default)]
    iat: Option<i64>,
}

fn malformed(reason: impl Into<String>) -> Error {
    AuthError::MalformedCredential {
        reason: reason.into(),
    }
    .into()
}

fn timestamp(secs: Option<i64>, field: &str) -> Result<Option<DateTime<Utc>>, Error> {
    match secs {
        None => Ok(None),
        Some(secs) => Utc
            .timestamp_opt(secs, 0)
            .single()
            .map(Some)
            .ok_or_else(|| malformed(format!("'{}' is out of range", field))),
    }
}

impl Claims {
    /// Decode the claims carried by a raw token.
    ///
    /// The payload segment is base64url-decoded (padding tolerated) and parsed
    /// as JSON. Fails with [`AuthError::MalformedCredential`] when the token
    /// is not three dot-separated segments, the payload is not valid JSON, or
    /// `sub`/`role` are missing or invalid.
    pub fn decode(token: &str) -> Result<Self, Error> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(malformed("expected three dot-separated segments"));
        };

        if header.is_empty() || payload.is_empty() {
            return Err(malformed("empty token segment"));
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| malformed(format!("payload is not base64url: {}", e)))?;

        let raw: RawClaims = serde_json::from_slice(&bytes)
            .map_err(|e| malformed(format!("payload is not valid claims: {}", e)))?;

        Ok(Self {
            subject_id: raw.sub,
            role: raw.role,
            expiry: timestamp(raw.exp, "exp")?,
            issued_at: timestamp(raw.iat, "iat")?,
        })
    }

    /// The id of the user the token was issued to.
    pub fn subject_id(&self) -> UserId {
        self.subject_id
    }

    /// The role granted by the token.
    pub fn role(&self) -> Role {
        self.role
    }

    /// When the token stops being accepted by the server, if stated.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry
    }

    /// When the token was issued, if stated.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.issued_at
    }

    /// Whether the stated expiry lies before `now`.
    ///
    /// Informational only: admission never consults it.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|exp| exp <= now)
    }
}
