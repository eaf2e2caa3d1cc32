//! Durable session storage trait.

use serde::{Deserialize, Serialize};

use crate::Result;

/// The persisted form of a session.
///
/// Claims are never stored; they are re-derived from `credential` on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// The raw access token, if signed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
    /// Opaque server session state (the `Cookie` header the backend set).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_state: Option<String>,
}

impl StoredSession {
    /// Returns true when there is nothing worth persisting.
    pub fn is_empty(&self) -> bool {
        self.credential.is_none() && self.server_state.is_none()
    }
}

/// Client-side storage that lets a session survive restarts.
///
/// Implementations must make `save` durable before returning.
pub trait SessionStorage: Send + Sync {
    /// Load the last saved session, if any.
    fn load(&self) -> Result<Option<StoredSession>>;

    /// Replace the saved session.
    fn save(&self, session: &StoredSession) -> Result<()>;

    /// Remove the saved session. Removing an absent session is not an error.
    fn clear(&self) -> Result<()>;
}
