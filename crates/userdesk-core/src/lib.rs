//! userdesk-core - Session, credential and admission primitives.
//!
//! The [`SessionStore`] owns the current credential; transports read it and
//! guards consult it. Nothing here performs network I/O.
//!
//! # Example
//!
//! ```
//! use userdesk_core::{Route, SessionStore, navigate};
//!
//! let session = SessionStore::in_memory();
//! assert_eq!(navigate(Route::Admin, &session), Route::Login);
//! ```

pub mod credentials;
pub mod error;
pub mod guards;
pub mod session;
pub mod token;
pub mod traits;
pub mod types;
pub mod user;

pub use credentials::{Credentials, Password};
pub use error::{Error, ErrorKind};
pub use guards::{Admission, Guard, Route, navigate};
pub use session::{MemoryStorage, SessionStore};
pub use token::{Claims, Credential};
pub use traits::{SessionStorage, StoredSession};
pub use types::{ApiUrl, Role, UserId};
pub use user::{CreateUserInput, SignUpInput, User, UserUpdate};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
