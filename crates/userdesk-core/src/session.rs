//! Session store: the single owner of the current credential.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::Result;
use crate::error::{Error, StorageError};
use crate::token::{Claims, Credential};
use crate::traits::{SessionStorage, StoredSession};
use crate::types::UserId;

/// Holds the current credential and the claims derived from it.
///
/// A `SessionStore` is an explicitly owned handle: clone it (clones share
/// state) and hand it to the transport and the guards. Every mutation is
/// written to the backing [`SessionStorage`] before the in-memory state
/// changes, so a restart restores the last session that was reported as set.
///
/// Claims are present if and only if a well-formed credential is present.
/// Expiry is not checked locally; the server decides when a credential is
/// no longer acceptable.
///
/// # Example
///
/// ```
/// use userdesk_core::SessionStore;
///
/// let session = SessionStore::in_memory();
/// assert!(!session.is_authenticated());
/// assert!(session.set_credential(Some("not-a-token")).is_err());
/// ```
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: RwLock<SessionState>,
    storage: Box<dyn SessionStorage>,
}

#[derive(Clone, Default)]
struct SessionState {
    credential: Option<Credential>,
    claims: Option<Claims>,
    server_state: Option<String>,
}

impl SessionState {
    fn to_stored(&self) -> StoredSession {
        StoredSession {
            credential: self.credential.as_ref().map(|c| c.as_str().to_string()),
            server_state: self.server_state.clone(),
        }
    }
}

impl SessionStore {
    /// Restore a session from `storage`.
    ///
    /// A stored credential that no longer decodes is discarded and the
    /// session starts signed out. The same goes for stored data that cannot
    /// be parsed at all; it is removed from `storage`. Other storage errors
    /// are returned.
    pub fn open(storage: impl SessionStorage + 'static) -> Result<Self> {
        let stored = match storage.load() {
            Ok(stored) => stored.unwrap_or_default(),
            Err(Error::Storage(StorageError::Format { message })) => {
                warn!(%message, "Discarding unreadable stored session");
                storage.clear()?;
                StoredSession::default()
            }
            Err(e) => return Err(e),
        };

        let mut state = SessionState {
            server_state: stored.server_state,
            ..SessionState::default()
        };

        if let Some(raw) = stored.credential {
            match Claims::decode(&raw) {
                Ok(claims) => {
                    debug!(subject = %claims.subject_id(), role = %claims.role(), "Restored session");
                    state.credential = Some(Credential::new(raw));
                    state.claims = Some(claims);
                }
                Err(e) => warn!(error = %e, "Discarding malformed stored credential"),
            }
        }

        Ok(Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(state),
                storage: Box::new(storage),
            }),
        })
    }

    /// A store that keeps its state in memory only.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(SessionState::default()),
                storage: Box::new(MemoryStorage::new()),
            }),
        }
    }

    /// Set or clear the credential.
    ///
    /// With `Some(raw)`, the claims are decoded first; if decoding fails the
    /// call returns [`AuthError::MalformedCredential`](crate::error::AuthError)
    /// and the session is left exactly as it was. With `None`, the
    /// credential and claims are cleared.
    pub fn set_credential(&self, raw: Option<&str>) -> Result<()> {
        let mut state = self.inner.state.write();

        let next = match raw {
            Some(raw) => {
                let claims = Claims::decode(raw)?;
                info!(subject = %claims.subject_id(), role = %claims.role(), "Credential set");
                SessionState {
                    credential: Some(Credential::new(raw)),
                    claims: Some(claims),
                    server_state: state.server_state.clone(),
                }
            }
            None => {
                info!("Credential cleared");
                SessionState {
                    server_state: state.server_state.clone(),
                    ..SessionState::default()
                }
            }
        };

        self.persist(&next)?;
        *state = next;
        Ok(())
    }

    /// Sign out: drop the credential, claims and server session state.
    ///
    /// Idempotent.
    pub fn clear(&self) -> Result<()> {
        let mut state = self.inner.state.write();
        let next = SessionState::default();
        self.persist(&next)?;
        if state.credential.is_some() {
            info!("Session cleared");
        }
        *state = next;
        Ok(())
    }

    /// The current credential, if any.
    pub fn current_credential(&self) -> Option<Credential> {
        self.inner.state.read().credential.clone()
    }

    /// The claims of the current credential, if any.
    pub fn claims(&self) -> Option<Claims> {
        self.inner.state.read().claims.clone()
    }

    /// The id of the signed-in user, if any.
    pub fn subject_id(&self) -> Option<UserId> {
        self.inner
            .state
            .read()
            .claims
            .as_ref()
            .map(Claims::subject_id)
    }

    /// Whether a credential is present.
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.read().credential.is_some()
    }

    /// Whether the current credential grants the admin role.
    ///
    /// Always false without a session.
    pub fn is_admin(&self) -> bool {
        self.inner
            .state
            .read()
            .claims
            .as_ref()
            .is_some_and(|c| c.role().is_admin())
    }

    /// Opaque server session state (cookies) remembered for this session.
    pub fn server_state(&self) -> Option<String> {
        self.inner.state.read().server_state.clone()
    }

    /// Replace the remembered server session state.
    ///
    /// Does nothing when the value is unchanged.
    pub fn set_server_state(&self, server_state: Option<String>) -> Result<()> {
        let mut state = self.inner.state.write();
        if state.server_state == server_state {
            return Ok(());
        }

        let next = SessionState {
            server_state,
            ..state.clone()
        };
        self.persist(&next)?;
        debug!("Server session state updated");
        *state = next;
        Ok(())
    }

    fn persist(&self, state: &SessionState) -> Result<()> {
        let stored = state.to_stored();
        if stored.is_empty() {
            self.inner.storage.clear()
        } else {
            self.inner.storage.save(&stored)
        }
    }
}

// Custom Debug impl that hides sensitive data
impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("SessionStore")
            .field("authenticated", &state.credential.is_some())
            .field("claims", &state.claims)
            .field("server_state", &state.server_state.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Session storage that lives only as long as the process.
///
/// Clones share the same slot, which lets tests observe what a store wrote.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<StoredSession>>>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage that already holds `session`.
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(session))),
        }
    }

    /// The currently saved session.
    pub fn snapshot(&self) -> Option<StoredSession> {
        self.slot.lock().clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<StoredSession>> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, session: &StoredSession) -> Result<()> {
        *self.slot.lock() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock() = None;
        Ok(())
    }
}
