//! userdesk-file - Filesystem-backed session storage for userdesk.
//!
//! [`FileSessionStorage`] keeps the session in a single JSON file so a
//! sign-in survives process restarts.

mod storage;

pub use storage::FileSessionStorage;
