//! Core traits for collaborators of the session store.

mod storage;

pub use storage::{SessionStorage, StoredSession};
