//! userdesk-http - Authenticated REST access to the user-management API.
//!
//! [`AuthedTransport`] attaches the session credential and retries once
//! after refreshing it; [`ApiClient`] exposes one method per endpoint; the
//! [`flows`] module strings calls together the way the pages do.

mod api;
mod config;
pub mod flows;
mod rest;
mod transport;

pub use api::ApiClient;
pub use config::{ClientConfig, USER_AGENT};
pub use transport::{AuthedTransport, PendingRequest};
