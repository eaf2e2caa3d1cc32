//! REST client implementation.
//!
//! This module provides the raw HTTP layer: one request in, one response or
//! classified error out. Retry policy lives in the transport.

mod client;
mod endpoints;

pub(crate) use client::RestClient;
pub(crate) use endpoints::*;
